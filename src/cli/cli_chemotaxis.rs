use crate::Chemotaxis::chemotaxis_error::ChemotaxisError;
use crate::Chemotaxis::task::{ChemotaxisTask, TaskConfig, create_template};
use crate::cli::chemotaxis_help::CHEMOTAXIS_HELPER;
use log::error;
use std::io::{self, Write};
use std::path::PathBuf;

const TEMPLATE_FILE: &str = "chemotaxis_task.json";

pub fn chemotaxis_menu() {
    loop {
        println!("\n=== Chemotaxis Tasks ===");
        println!("\x1b[33m1. Run default task\x1b[0m");
        println!("\x1b[33m2. Solve from file\x1b[0m");
        println!("\x1b[33m3. Auto-discover task files\x1b[0m");
        println!("\x1b[33m4. Generate template\x1b[0m");
        println!("\x1b[33m5. Read help\x1b[0m");
        println!("\x1b[33m0. Back to main menu\x1b[0m");
        print!("\x1b[36mEnter your choice: \x1b[0m");
        let _ = io::stdout().flush();

        let choice = get_user_input();
        match choice.trim() {
            "1" => report(run_task(TaskConfig::default())),
            "2" => solve_from_file(),
            "3" => auto_solve_tasks(),
            "4" => report(create_template(TEMPLATE_FILE)),
            "5" => show_help(),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn report(result: Result<(), ChemotaxisError>) {
    if let Err(e) = result {
        error!("{}", e);
        println!("\x1b[31mError: {}\x1b[0m", e);
    }
}

fn solve_from_file() {
    print!("\x1b[36mEnter file path: \x1b[0m");
    let _ = io::stdout().flush();
    let file_path = get_user_input();
    let path = PathBuf::from(file_path.trim());

    if path.exists() {
        report(solve_from_file_dialog(path));
    } else {
        println!("File not found: {}", file_path.trim());
    }
}

fn auto_solve_tasks() {
    use std::{env, fs};

    let current_dir = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            println!("Failed to get current directory: {}", e);
            return;
        }
    };
    println!("Searching for task files in: {:?}", current_dir);

    let mut found_files = false;
    if let Ok(entries) = fs::read_dir(&current_dir) {
        let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
        paths.sort();
        for path in paths {
            let is_task = path
                .file_name()
                .map(|name| {
                    let name = name.to_string_lossy();
                    name.starts_with("task") && name.ends_with(".json")
                })
                .unwrap_or(false);
            if is_task && path.is_file() {
                println!("Found task file: {:?}", path);
                report(solve_from_file_dialog(path));
                found_files = true;
            }
        }
    }

    if !found_files {
        println!("No files named 'task*.json' found in current directory.");
    }
}

pub fn get_user_input() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        println!("Failed to read input: {}", e);
    }
    input
}

pub fn solve_from_file_dialog(path: PathBuf) -> Result<(), ChemotaxisError> {
    let config = TaskConfig::from_file(&path.to_string_lossy())?;
    println!("Task parsed successfully");
    println!("{}", serde_json::to_string_pretty(&config)?);

    print!("\x1b[36mStart calculation? (y/n): \x1b[0m");
    let _ = io::stdout().flush();
    let choice = get_user_input();

    if choice.trim().to_lowercase() == "y" || choice.trim().to_lowercase() == "yes" {
        run_task(config)
    } else {
        println!("Calculation cancelled. Returning to menu.");
        Ok(())
    }
}

/// run a task to completion, pausing at the end when the config asks for it
pub fn run_task(config: TaskConfig) -> Result<(), ChemotaxisError> {
    let pause = config.pause_on_finish;
    let output_dir = config.output_dir.clone();
    let mut task = ChemotaxisTask::new(config)?;
    task.run()?;
    println!("\x1b[32mfinished, results in {}\x1b[0m", output_dir);
    if pause {
        print!("\x1b[36mPress Enter to continue...\x1b[0m");
        let _ = io::stdout().flush();
        let _ = get_user_input();
    }
    Ok(())
}

/// non-interactive entry point: run the task described by `path`
pub fn run_task_file(path: &str) -> Result<(), ChemotaxisError> {
    run_task(TaskConfig::from_file(path)?)
}

pub fn show_parameter_cases() {
    match crate::Chemotaxis::parameters::ParameterTable::builtin() {
        Ok(table) => {
            println!("\n=== Built-in parameter cases ===");
            table.print_cases();
            print!("\x1b[36mShow case (name, empty to return): \x1b[0m");
            let _ = io::stdout().flush();
            let name = get_user_input();
            let name = name.trim();
            if !name.is_empty() {
                match table.select(name) {
                    Ok(params) => params.pretty_print(name),
                    Err(e) => report(Err(e)),
                }
            }
        }
        Err(e) => report(Err(e)),
    }
}

fn show_help() {
    println!("\n=== Chemotaxis Help ===");
    println!("{}", CHEMOTAXIS_HELPER);
    println!("\nPress Enter to return to menu...");
    let _ = get_user_input();
}
