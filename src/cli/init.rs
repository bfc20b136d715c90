use std::path::PathBuf;

use colored::Colorize;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};
use crate::users;

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    std::fs::create_dir_all(PathBuf::from(&settings.data_dir).join("store"))?;
    save_settings(&settings)?;
    // Writes the seed registry on first run, keeps an existing one as is.
    users::save_users(&users::load_users())?;

    println!("{}", "Bolso initialized.".green());
    println!("  Data directory: {}", settings.data_dir);
    println!("  Titular account (guest view): {}", settings.titular_account);
    if settings.extractor_url.is_empty() {
        println!("  Extraction service: not configured (CSV statements still parse locally)");
    } else {
        println!("  Extraction service: {}", settings.extractor_url);
    }
    println!();
    println!("Try these next:");
    println!("  bolso users list");
    println!("  bolso demo --user Brenno");
    println!("  bolso upload extrato.csv --user Brenno");
    Ok(())
}
