// src/seed.rs

//! Default subject catalog, loaded on first start.

use sqlx::SqlitePool;

use crate::{error::AppError, models::question::NewQuestion, questions::SqlQuestionBank};

struct SeedSubject {
    name: &'static str,
    icon: &'static str,
    color: &'static str,
    description: &'static str,
    questions: &'static [(&'static str, [&'static str; 4], i64, bool)],
}

const SUBJECTS: &[SeedSubject] = &[
    SeedSubject {
        name: "Mathematics",
        icon: "🔢",
        color: "#58CC02",
        description: "Numbers, algebra, and geometry",
        questions: &[
            ("What is 15 + 27?", ["42", "43", "41", "40"], 0, false),
            ("What is 8 × 7?", ["54", "56", "58", "64"], 1, false),
            ("What is 100 ÷ 4?", ["20", "30", "25", "15"], 2, false),
            ("What is the square root of 81?", ["7", "8", "9", "10"], 2, false),
            ("What is 50% of 120?", ["50", "55", "60", "65"], 2, false),
            ("What is 5 + 3?", ["7", "8", "9", "10"], 1, true),
            ("What is 3 × 3?", ["6", "9", "12", "15"], 1, true),
        ],
    },
    SeedSubject {
        name: "Science",
        icon: "🔬",
        color: "#1CB0F6",
        description: "Physics, chemistry, and biology basics",
        questions: &[
            ("What is the chemical symbol for water?", ["H2O", "CO2", "O2", "NaCl"], 0, false),
            ("What planet is known as the Red Planet?", ["Venus", "Jupiter", "Mars", "Saturn"], 2, false),
            ("What is the largest organ in the human body?", ["Heart", "Liver", "Brain", "Skin"], 3, false),
            ("What is the powerhouse of the cell?", ["Nucleus", "Ribosome", "Mitochondria", "Golgi body"], 2, false),
            ("What do we breathe in?", ["Carbon dioxide", "Oxygen", "Nitrogen", "Helium"], 1, true),
        ],
    },
    SeedSubject {
        name: "English",
        icon: "📖",
        color: "#FF9600",
        description: "Grammar, vocabulary, and reading",
        questions: &[
            ("What is the past tense of \"go\"?", ["Goed", "Gone", "Went", "Going"], 2, false),
            ("Which is a noun?", ["Run", "Beautiful", "Happiness", "Quickly"], 2, false),
            ("What is the plural of \"child\"?", ["Childs", "Children", "Childes", "Child's"], 1, false),
        ],
    },
    SeedSubject {
        name: "History",
        icon: "🏛️",
        color: "#CE82FF",
        description: "World history and civilizations",
        questions: &[],
    },
    SeedSubject {
        name: "Geography",
        icon: "🌍",
        color: "#FF4B4B",
        description: "Countries, capitals, and maps",
        questions: &[],
    },
];

/// Inserts the default subjects and their starter questions when the
/// catalog is empty. Returns the number of subjects created.
pub async fn seed_subjects(pool: &SqlitePool) -> Result<usize, AppError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let bank = SqlQuestionBank::new(pool.clone());

    for subject in SUBJECTS {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO subjects (name, icon, color, description) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(subject.name)
        .bind(subject.icon)
        .bind(subject.color)
        .bind(subject.description)
        .fetch_one(pool)
        .await?;

        let questions: Vec<NewQuestion> = subject
            .questions
            .iter()
            .map(|(text, options, correct, remedial)| NewQuestion {
                question_text: text.to_string(),
                options: options.iter().map(|o| o.to_string()).collect(),
                correct_answer: *correct,
                is_remedial: *remedial,
            })
            .collect();

        if !questions.is_empty() {
            bank.insert_questions(id, &questions).await?;
        }
    }

    tracing::info!("Seeded {} subjects", SUBJECTS.len());
    Ok(SUBJECTS.len())
}
