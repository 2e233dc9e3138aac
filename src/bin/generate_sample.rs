use painel_desempenho::schema::{DESCRIPTORS_2025, SCHOOL_ASSESSMENT};
use rust_xlsxwriter::{Workbook, XlsxError};

/// Minimal deterministic PRNG (splitmix64)
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in [lo, hi), rounded to one decimal place.
    fn score(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        ((lo + unit * (hi - lo)) * 10.0).round() / 10.0
    }
}

const STAGES: [&str; 2] = ["5º ANO", "9º ANO"];

const MATH_DESCRIPTORS: [(&str, &str); 5] = [
    ("D02", "Reconhecer e utilizar características do sistema de numeração decimal"),
    ("D07", "Resolver problemas com números naturais envolvendo diferentes significados das operações"),
    ("D13", "Identificar frações equivalentes"),
    ("D19", "Resolver problemas envolvendo o cálculo de perímetro de figuras planas"),
    ("D24", "Ler informações e dados apresentados em tabelas e gráficos"),
];

const PORTUGUESE_DESCRIPTORS: [(&str, &str); 5] = [
    ("D01", "Localizar informações explícitas em um texto"),
    ("D04", "Inferir uma informação implícita em um texto"),
    ("D06", "Identificar o tema de um texto"),
    ("D11", "Distinguir um fato da opinião relativa a esse fato"),
    ("D15", "Reconhecer diferentes formas de tratar uma informação"),
];

const SCHOOLS: [&str; 4] = [
    "EMEF BELA VISTA",
    "EMEF CENTRO",
    "EMEF PARQUE DAS FLORES",
    "EMEF SANTA RITA",
];

fn main() -> Result<(), XlsxError> {
    let mut rng = SampleRng::new(2025);
    let mut workbook = Workbook::new();

    // ---- Sheet 1: per-descriptor averages, scores as "NN,N%" strings ----
    // Includes the stray index column a spreadsheet exported from pandas
    // carries, so the loader's column cleanup is exercised.
    let sheet = workbook.add_worksheet().set_name(DESCRIPTORS_2025.sheet_name)?;

    sheet.write_string(0, 0, "Unnamed: 0")?;
    for (i, col) in DESCRIPTORS_2025.required_columns.iter().enumerate() {
        sheet.write_string(0, (i + 1) as u16, *col)?;
    }

    let mut row: u32 = 1;
    for etapa in STAGES {
        for (componente, descriptors) in [
            ("MATEMÁTICA", &MATH_DESCRIPTORS),
            ("LÍNGUA PORTUGUESA", &PORTUGUESE_DESCRIPTORS),
        ] {
            for (code, description) in descriptors {
                let score = rng.score(30.0, 92.0);
                let score_text = format!("{score:.1}%").replace('.', ",");

                sheet.write_number(row, 0, (row - 1) as f64)?;
                sheet.write_string(row, 1, *code)?;
                sheet.write_string(row, 2, score_text)?;
                sheet.write_string(row, 3, componente)?;
                sheet.write_string(row, 4, etapa)?;
                sheet.write_string(row, 5, *description)?;
                row += 1;
            }
        }
    }
    let descriptor_rows = row - 1;

    // ---- Sheet 2: per-school, per-question results, numeric scores ----
    let sheet = workbook.add_worksheet().set_name(SCHOOL_ASSESSMENT.sheet_name)?;

    for (i, col) in SCHOOL_ASSESSMENT.required_columns.iter().enumerate() {
        sheet.write_string(0, i as u16, *col)?;
    }

    let mut row: u32 = 1;
    for escola in SCHOOLS {
        for etapa in STAGES {
            for questao in 1..=10u32 {
                let (componente, descriptors) = if questao % 2 == 0 {
                    ("MATEMÁTICA", &MATH_DESCRIPTORS)
                } else {
                    ("LÍNGUA PORTUGUESA", &PORTUGUESE_DESCRIPTORS)
                };
                let (code, _) = descriptors[(questao as usize / 2) % descriptors.len()];

                sheet.write_string(row, 0, escola)?;
                sheet.write_number(row, 1, rng.score(18.0, 96.0))?;
                sheet.write_number(row, 2, questao as f64)?;
                sheet.write_string(row, 3, code)?;
                sheet.write_string(row, 4, etapa)?;
                sheet.write_string(row, 5, componente)?;
                row += 1;
            }
        }
    }
    let school_rows = row - 1;

    let output_path = "desempenho_sample.xlsx";
    workbook.save(output_path)?;

    println!(
        "Escrito {output_path}: {descriptor_rows} linhas em {} e {school_rows} linhas em {}",
        DESCRIPTORS_2025.sheet_name, SCHOOL_ASSESSMENT.sheet_name
    );
    Ok(())
}
