extern crate cellcalc;
extern crate env_logger;
extern crate itertools;

use std::env;
use std::io::{stdin, stdout, BufRead, Write};

use itertools::Itertools;

use cellcalc::error::Result;
use cellcalc::parser::variable_table::VariableTable;
use cellcalc::persistence;
use cellcalc::{ChangeSet, ExpressionTree, SheetConfig, Spreadsheet};

const HELP: &str = "\
Commands:
  set <cell> <text>         Set the text of a cell; text starting with '=' is a formula
  color <AARRGGBB> <cell>.. Set the background color of one or more cells
  get <cell>                Show the text, value and color of a cell
  eval <expression>         Evaluate an expression that uses no cells
  undo | redo               Undo or redo the last edit
  show                      List every cell that is not empty
  save <path> | load <path> Save or load the sheet as JSON
  help | quit";

/// Console host for a Spreadsheet. An optional first argument names a JSON config file.
fn main() {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => match SheetConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Unable to read config {}: {}", path, e);
                return;
            }
        },
        None => SheetConfig::default()
    };
    let mut sheet = match Spreadsheet::from_config(&config) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    println!("{} x {} grid. Type 'help' for commands.", sheet.row_count(), sheet.column_count());

    let input = stdin();
    loop {
        print!("> ");
        if stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match input.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => ()
        }
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let (command, rest) = split_word(line.trim_start());
        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            _ => {
                if let Err(e) = run(&mut sheet, command, rest) {
                    println!("Error: {}", e);
                }
            }
        }
    }
}

fn run(sheet: &mut Spreadsheet, command: &str, rest: &str) -> Result<()> {
    match command {
        "set" => {
            let (name, text) = split_word(rest);
            let position = sheet.locate(name)?;
            let changes = sheet.set_text(position.row, position.column, text)?;
            report(sheet, &changes);
        },
        "color" => {
            let (hex, names) = split_word(rest);
            let color = match u32::from_str_radix(hex, 16) {
                Ok(color) => color,
                Err(_) => {
                    println!("'{}' is not an AARRGGBB hex color", hex);
                    return Ok(());
                }
            };
            let mut cells = Vec::new();
            for name in names.split_whitespace() {
                let position = sheet.locate(name)?;
                cells.push((position.row, position.column));
            }
            let changes = sheet.set_color(&cells, color)?;
            report(sheet, &changes);
        },
        "get" => {
            let cell = sheet.cell_named(rest.trim())?;
            println!("{}  text: {:?}  value: {:?}  color: {:08X}", cell.name(), cell.text(), cell.value(), cell.color());
        },
        "eval" => {
            match ExpressionTree::new(rest).and_then(|tree| tree.evaluate(&VariableTable::new())) {
                Ok(number) => println!("{}", number),
                Err(e) => println!("Error: {}", e)
            }
        },
        "undo" => {
            let message = sheet.undo_message();
            let changes = sheet.undo();
            if let Some(message) = message { println!("{}", message); }
            report(sheet, &changes);
        },
        "redo" => {
            let message = sheet.redo_message();
            let changes = sheet.redo();
            if let Some(message) = message { println!("{}", message); }
            report(sheet, &changes);
        },
        "show" => {
            for cell in sheet.touched_cells() {
                println!("{:>4}  {:<20} {:<20} {:08X}", cell.name().to_string(), cell.text(), cell.value(), cell.color());
            }
        },
        "save" => {
            persistence::save_to_file(sheet, rest.trim())?;
            println!("Saved to {}", rest.trim());
        },
        "load" => {
            let count = persistence::load_from_file(sheet, rest.trim())?;
            println!("Loaded {} cells from {}", count, rest.trim());
        },
        _ => println!("Unknown command '{}'. Type 'help' for commands.", command)
    }
    Ok(())
}

/// Split off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, "")
    }
}

/// Print the new value of every cell whose value changed.
fn report(sheet: &Spreadsheet, changes: &ChangeSet) {
    let updates = changes
        .cells_with(cellcalc::CellAspect::Value)
        .into_iter()
        .filter_map(|(row, column)| sheet.cell(row, column))
        .map(|cell| format!("{} = {}", cell.name(), cell.value()))
        .join(", ");
    if !updates.is_empty() {
        println!("{}", updates);
    }
}
