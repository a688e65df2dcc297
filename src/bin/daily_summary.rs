//! Print a user's daily calorie report
//!
//! Usage: daily_summary <user_id> [YYYY-MM-DD] [--json]

use weightmgr::config::Settings;
use weightmgr::db::{migrations, Database};
use weightmgr::tools::diary;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut json = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            positional.push(arg);
        }
    }

    let Some(user_id) = positional.first() else {
        eprintln!("Usage: daily_summary <user_id> [YYYY-MM-DD] [--json]");
        std::process::exit(2);
    };
    let date = positional.get(1).map(String::as_str);

    let settings = Settings::from_env();
    eprintln!("Database path: {}", settings.database_path.display());

    let database = Database::new(&settings.database_path)?;
    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let report = diary::get_daily_report(&database, user_id, date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }

    Ok(())
}
