use super::cli_chemotaxis::{chemotaxis_menu, get_user_input, show_parameter_cases};
use std::io::{self, Write};

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => chemotaxis_menu(),
            "2" => show_parameter_cases(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text
Yellow (\x1b[33m) - Menu options
Cyan (\x1b[36m) - prompts
Reset (\x1b[0m) - back to normal after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to ChemoTax: membrane chemotaxis on a 2D finite-volume grid\n \x1b[0m"
    );
    println!("\x1b[33m1. Chemotaxis tasks\x1b[0m");
    println!("\x1b[33m2. Parameter cases\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}
