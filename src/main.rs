use std::env;
use std::fs;
use std::process;

use quizpack_reader::{parse_package, RoundKind};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-package-file>", args[0]);
        process::exit(1);
    }

    let path = &args[1];
    println!("Reading quiz package: {}", path);
    println!("{}", "=".repeat(60));

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("ERROR: Failed to read {}: {}", path, e);
            process::exit(1);
        }
    };

    match parse_package(&bytes) {
        Ok(contents) => {
            println!("\n{}", "=".repeat(60));
            println!("SUCCESS! Parsing completed.");
            println!("{}", "=".repeat(60));

            println!("\nPackage Information:");
            println!("  Name: {}", contents.metadata.name);
            if let Some(version) = &contents.metadata.version {
                println!("  Version: {}", version);
            }
            if !contents.metadata.authors.is_empty() {
                println!("  Authors: {}", contents.metadata.authors.join(", "));
            }

            let finals = contents
                .round_kinds
                .values()
                .filter(|kind| **kind == RoundKind::Final)
                .count();

            println!("\nStatistics:");
            println!("  Rounds: {} ({} final)", contents.round_kinds.len(), finals);
            println!("  Questions: {}", contents.questions.len());
            println!("  Questions with media: {}", contents.file_storage.len());

            println!("\nSample Questions (first 10):");
            for (i, question) in contents.questions.iter().take(10).enumerate() {
                println!(
                    "  {}. [{} / {} / {}] ({}) {}",
                    i + 1,
                    question.round,
                    question.category,
                    question.score,
                    question.kind,
                    question.question_text.as_deref().unwrap_or("<media only>")
                );
            }

            if contents.questions.len() > 10 {
                println!("  ... and {} more", contents.questions.len() - 10);
            }
        }
        Err(e) => {
            eprintln!("\nERROR: Failed to parse package");
            eprintln!("  {}", e);
            process::exit(1);
        }
    }
}
