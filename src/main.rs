use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use miette::Result;

use squill::exec::Executor;
use squill::plan::Planner;
use squill::sql::parser::Parser;
use squill::{Catalog, Row};

fn main() -> Result<()> {
    env_logger::init();

    let catalog_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "data/catalog.json".to_owned());
    let catalog = Catalog::load_from_file(&catalog_path)?;

    // table data files live next to the catalog file
    let data_dir = Path::new(&catalog_path)
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let executor = Executor::new(data_dir);

    println!("squill - a toy SQL query engine");
    println!("{} tables loaded from {catalog_path}", catalog.len());
    println!("Type 'help' for help, 'exit' to quit.");
    println!();

    let stdin = io::stdin();
    loop {
        print!("squill> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let input = line.trim();
        match input {
            "" => continue,
            "exit" | "quit" => break,
            "help" => print_help(),
            _ => {
                if let Some(query) = input.strip_prefix("EXPLAIN ") {
                    run_explain(&catalog, query);
                } else {
                    run_query(&catalog, &executor, input);
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  help              show this help");
    println!("  exit, quit        leave the shell");
    println!("  EXPLAIN <query>   show the logical plan without running it");
    println!("  <query>           run a SELECT query");
    println!();
    println!("Examples:");
    println!("  SELECT * FROM users");
    println!("  SELECT name, age FROM users WHERE age > 21");
    println!("  SELECT name, amount FROM users JOIN orders ON id = user_id");
}

fn run_explain(catalog: &Catalog, query: &str) {
    let Some(statement) = parse(query) else {
        return;
    };

    match Planner::new(catalog).create_logical_plan(&statement) {
        Ok(plan) => {
            println!();
            println!("Logical Plan:");
            println!("-------------");
            print!("{}", plan.explain());
            println!();
        }
        Err(err) => println!("Planning error: {err}"),
    }
}

fn run_query(catalog: &Catalog, executor: &Executor, query: &str) {
    let Some(statement) = parse(query) else {
        return;
    };

    let plan = match Planner::new(catalog).create_logical_plan(&statement) {
        Ok(plan) => plan,
        Err(err) => {
            println!("Planning error: {err}");
            return;
        }
    };

    match executor.execute(&plan) {
        Ok(rows) => render_results(&plan, &rows),
        Err(err) => println!("Execution error: {err}"),
    }
}

fn parse(query: &str) -> Option<squill::sql::parser::Statement<'_>> {
    let mut parser = Parser::new(query);
    let statement = parser.parse();

    if !parser.errors().is_empty() {
        println!("Parse errors:");
        for err in parser.errors() {
            println!("  - {err}");
        }
        return None;
    }

    statement
}

fn render_results(plan: &squill::LogicalPlan<'_>, rows: &[Row]) {
    let columns: Vec<String> = plan
        .schema()
        .into_iter()
        .map(|column| column.name)
        .collect();

    println!();
    let header: Vec<String> = columns
        .iter()
        .map(|name| format!("{name:<20}"))
        .collect();
    println!("{}", header.join("| "));
    println!("{}", "-".repeat(columns.len() * 22));

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|name| match row.get(name) {
                Some(value) => format!("{value:<20}"),
                None => format!("{:<20}", "NULL"),
            })
            .collect();
        println!("{}", cells.join("| "));
    }

    println!();
    println!("({} rows)", rows.len());
}
