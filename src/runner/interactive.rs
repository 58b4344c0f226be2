//! Interactive menu driver
//!
//! Reads choices from any `BufRead` (stdin in the binary) and dispatches to
//! the [`RunLoop`]. Invalid input and batch setup failures return to the menu;
//! end of input leaves the loop.

use colored::Colorize;
use std::io::{BufRead, Write};

use super::menu::{
    build_lending_request, build_swap_request, parse_amount, parse_cycle_count,
    parse_menu_choice, select_token, token_listing, MenuChoice, MENU_TEXT,
};
use super::{BatchContext, RunLoop};
use crate::errors::BotError;
use crate::logger::{self, LogTag};
use crate::scheduler::{ActionKind, ActionRequest};
use crate::session::TokenDescriptor;

fn prompt<R: BufRead>(input: &mut R, text: &str) -> Option<String> {
    print!("{}", text);
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn prompt_token<'a, R: BufRead>(
    input: &mut R,
    tokens: &'a [TokenDescriptor],
    title: &str,
) -> Option<&'a TokenDescriptor> {
    println!("{}", title.cyan());
    println!("{}", token_listing(tokens));
    let answer = prompt(input, "> ")?;
    select_token(tokens, &answer)
}

/// Ask for token(s) and amount; `Err` carries the message shown before
/// returning to the menu
fn resolve_action<R: BufRead>(
    input: &mut R,
    kind: ActionKind,
    context: &BatchContext,
) -> Result<ActionRequest, String> {
    let tokens = &context.tokens;

    if kind == ActionKind::Swap {
        let from = prompt_token(input, tokens, "Select token to swap FROM:")
            .ok_or("Invalid 'from' token selection.")?;
        let to = prompt_token(input, tokens, "Select token to swap TO:")
            .ok_or("Invalid 'to' token selection.")?;
        if from.symbol == to.symbol {
            return Err("Cannot swap to the same token.".to_string());
        }
        let amount = prompt(input, &format!("Amount of {} to swap: ", from.symbol))
            .and_then(|a| parse_amount(&a))
            .ok_or("Invalid amount.")?;
        return build_swap_request(from, to, amount);
    }

    let token = prompt_token(input, tokens, &format!("Select a token to {}:", kind))
        .ok_or("Invalid token selection.")?;
    let amount = prompt(input, &format!("Amount of {} to {}: ", token.symbol, kind))
        .and_then(|a| parse_amount(&a))
        .ok_or("Invalid amount.")?;
    build_lending_request(kind, token, amount)
}

pub async fn run_menu<R: BufRead>(run_loop: &mut RunLoop, input: &mut R) -> Result<(), BotError> {
    loop {
        println!();
        println!("{}", "--- CHOOSE A FEATURE TO RUN ---".bold().cyan());
        let Some(answer) = prompt(input, &format!("{}\n> ", MENU_TEXT)) else {
            return Ok(());
        };

        let choice = match parse_menu_choice(&answer) {
            Some(MenuChoice::Exit) => {
                logger::info(LogTag::Runner, "Exiting bot. Goodbye!");
                return Ok(());
            }
            Some(choice) => choice,
            None => {
                logger::error(
                    LogTag::Runner,
                    "Invalid choice. Please select a number between 1 and 7.",
                );
                continue;
            }
        };

        let Some(answer) = prompt(input, "How many transaction cycles to run per wallet? ") else {
            return Ok(());
        };
        let Some(cycles) = parse_cycle_count(&answer) else {
            logger::error(LogTag::Runner, "Invalid number. Returning to menu.");
            continue;
        };

        let context = match run_loop.prepare_batch().await {
            Ok(context) => context,
            Err(e) => {
                logger::error(LogTag::Runner, &format!("Initial setup failed: {}", e));
                continue;
            }
        };

        match choice {
            MenuChoice::Daily => {
                logger::info(LogTag::Runner, "You chose: Run All Features Daily");
                run_loop.run_daily(&context, cycles).await;
            }
            MenuChoice::Single(kind) => {
                let request = match resolve_action(input, kind, &context) {
                    Ok(request) => request,
                    Err(message) => {
                        logger::error(LogTag::Runner, &message);
                        continue;
                    }
                };
                run_loop.run_single_action(&context, &request, cycles).await;
                logger::info(
                    LogTag::Runner,
                    &format!(
                        "{} task has been run on all wallets. Returning to menu.",
                        kind
                    ),
                );
            }
            MenuChoice::Exit => return Ok(()),
        }
    }
}
