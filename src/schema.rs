use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Schema descriptors – the two sheet layouts as data, not duplicated code
// ---------------------------------------------------------------------------

/// How a filterable column is presented and defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Exactly one value selected; defaults to the first value in sorted order.
    Single,
    /// Checkbox list; defaults to every value selected. Unchecking everything
    /// is an explicit "match nothing".
    Multi,
    /// Checkbox list that starts unselected; with nothing checked the column
    /// is unconstrained rather than matching nothing.
    MultiOptional,
}

/// A filterable column together with its widget caption and behaviour.
#[derive(Debug, Clone, Copy)]
pub struct FilterColumn {
    pub column: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

/// Captions for the four metric cards. The two layouts word these
/// differently (descriptors vs. questions).
#[derive(Debug, Clone, Copy)]
pub struct CardLabels {
    pub best: &'static str,
    pub worst: &'static str,
    pub count_caption: &'static str,
    pub count_sub: &'static str,
}

/// Everything variant-specific about one workbook layout: which sheet to
/// read, which columns must exist, which column carries the score, and how
/// the charts group the data.
#[derive(Debug)]
pub struct SchemaDescriptor {
    pub label: &'static str,
    pub sheet_name: &'static str,
    pub required_columns: &'static [&'static str],
    pub score_column: &'static str,
    /// Human caption for the score, used on chart axes ("Desempenho (%)").
    pub score_label: &'static str,
    pub filter_columns: &'static [FilterColumn],
    pub cards: CardLabels,
    /// Chart 1: x groups and colored series.
    pub primary_grouping: (&'static str, &'static str),
    pub primary_chart_title: &'static str,
    /// Chart 1 x-axis caption ("Ano Escolar", "Escola").
    pub primary_axis_label: &'static str,
    /// Default file name when chart 1 is saved as an image.
    pub primary_chart_png: &'static str,
    /// Chart 2: one bar per value of this column.
    pub descriptor_column: &'static str,
    /// Chart 2: selectable group-by columns.
    pub group_by_options: &'static [&'static str],
    /// Column rendered wide in the data table, if any.
    pub wide_column: Option<&'static str>,
}

/// Per-descriptor results exported by the 2025 diagnostic evaluation.
pub static DESCRIPTORS_2025: SchemaDescriptor = SchemaDescriptor {
    label: "Descritores 2025",
    sheet_name: "DESCRITORES_2025",
    required_columns: &[
        "DESCRITOR",
        "MÉDIA ACERTOS (%)",
        "COMPONENTE",
        "ETAPA",
        "DESCRIÇÃO",
    ],
    score_column: "MÉDIA ACERTOS (%)",
    score_label: "Média de Acertos (%)",
    filter_columns: &[
        FilterColumn {
            column: "ETAPA",
            label: "Selecione o(s) ano(s)",
            kind: FilterKind::Multi,
        },
        FilterColumn {
            column: "COMPONENTE",
            label: "Selecione o(s) componente(s) curricular(es)",
            kind: FilterKind::Multi,
        },
        FilterColumn {
            column: "DESCRITOR",
            label: "Selecione descritores específicos (opcional)",
            kind: FilterKind::MultiOptional,
        },
    ],
    cards: CardLabels {
        best: "Melhor Descritor",
        worst: "Pior Descritor",
        count_caption: "Total de descritores",
        count_sub: "Descritores filtrados",
    },
    primary_grouping: ("ETAPA", "COMPONENTE"),
    primary_chart_title: "Média de Acertos por Ano e Componente Curricular",
    primary_axis_label: "Ano Escolar",
    primary_chart_png: "desempenho_por_ano_componente.png",
    descriptor_column: "DESCRITOR",
    group_by_options: &["ETAPA", "COMPONENTE"],
    wide_column: Some("DESCRIÇÃO"),
};

/// Per-question results broken down by school (5th and 9th grade sheet).
pub static SCHOOL_ASSESSMENT: SchemaDescriptor = SchemaDescriptor {
    label: "Avaliação por Escola",
    sheet_name: "5°_ANO_E_9°_ANO",
    required_columns: &[
        "ESCOLA",
        "DESEMPENHO",
        "QUESTÃO",
        "DESCRITOR",
        "ETAPA",
        "COMP. CURRICULAR",
    ],
    score_column: "DESEMPENHO",
    score_label: "Desempenho (%)",
    filter_columns: &[
        FilterColumn {
            column: "ESCOLA",
            label: "Selecione a escola",
            kind: FilterKind::Single,
        },
        FilterColumn {
            column: "ETAPA",
            label: "Selecione a(s) etapa(s)",
            kind: FilterKind::Single,
        },
        FilterColumn {
            column: "COMP. CURRICULAR",
            label: "Selecione o(s) componente(s) curricular(es)",
            kind: FilterKind::Multi,
        },
        FilterColumn {
            column: "DESCRITOR",
            label: "Selecione descritores específicos (opcional)",
            kind: FilterKind::MultiOptional,
        },
    ],
    cards: CardLabels {
        best: "Melhor Desempenho",
        worst: "Baixo Desempenho",
        count_caption: "Total de questões",
        count_sub: "Questões filtradas",
    },
    primary_grouping: ("ESCOLA", "COMP. CURRICULAR"),
    primary_chart_title: "Média de Desempenho por Escola e Componente Curricular",
    primary_axis_label: "Escola",
    primary_chart_png: "desempenho_por_escola_componente.png",
    descriptor_column: "DESCRITOR",
    group_by_options: &["ETAPA", "COMP. CURRICULAR"],
    wide_column: Some("ESCOLA"),
};

/// Which workbook layout the app is reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaVariant {
    Descriptors2025,
    SchoolAssessment,
}

impl SchemaVariant {
    pub const ALL: [SchemaVariant; 2] =
        [SchemaVariant::Descriptors2025, SchemaVariant::SchoolAssessment];

    pub fn descriptor(self) -> &'static SchemaDescriptor {
        match self {
            SchemaVariant::Descriptors2025 => &DESCRIPTORS_2025,
            SchemaVariant::SchoolAssessment => &SCHOOL_ASSESSMENT,
        }
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }
}

impl SchemaDescriptor {
    /// Widget behaviour for a column, if it is filterable in this schema.
    pub fn filter_kind(&self, column: &str) -> Option<FilterKind> {
        self.filter_columns
            .iter()
            .find(|fc| fc.column == column)
            .map(|fc| fc.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_are_internally_consistent() {
        for variant in SchemaVariant::ALL {
            let schema = variant.descriptor();
            assert!(schema.required_columns.contains(&schema.score_column));
            for fc in schema.filter_columns {
                assert!(
                    schema.required_columns.contains(&fc.column),
                    "{}: filter column {} not required",
                    schema.label,
                    fc.column
                );
                assert_ne!(fc.column, schema.score_column);
            }
            let (x, series) = schema.primary_grouping;
            assert!(schema.required_columns.contains(&x));
            assert!(schema.required_columns.contains(&series));
            assert!(schema.required_columns.contains(&schema.descriptor_column));
            for col in schema.group_by_options {
                assert!(schema.required_columns.contains(col));
            }
            if let Some(col) = schema.wide_column {
                assert!(schema.required_columns.contains(&col));
            }
            assert!(schema.primary_chart_png.ends_with(".png"));
        }
    }

    #[test]
    fn filter_kind_lookup() {
        let schema = SchemaVariant::SchoolAssessment.descriptor();
        assert_eq!(schema.filter_kind("ESCOLA"), Some(FilterKind::Single));
        assert_eq!(schema.filter_kind("DESCRITOR"), Some(FilterKind::MultiOptional));
        assert_eq!(schema.filter_kind("DESEMPENHO"), None);
    }
}
