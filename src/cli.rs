use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::{
    db::{
        models::{ClinicalSession, ClinicalStaffRates, StaffDirectoryEntry, StaffNameMapping},
        Database,
    },
    import::{ImportController, ImportError, ImportPhase, WorkbookDecoder},
    pricing::{select_current_rates, session_cost, FinancialSummary},
    settings::SettingsStore,
};

/// Import monthly clinic schedules, reconcile staff names and price sessions.
#[derive(Parser, Debug)]
#[command(name = "clinic-finance", version)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "CLINIC_FINANCE_DB", default_value = "clinic_finance.sqlite3")]
    pub db: PathBuf,

    /// Settings JSON file
    #[arg(
        long,
        global = true,
        env = "CLINIC_FINANCE_SETTINGS",
        default_value = "clinic_finance_settings.json"
    )]
    pub settings: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the staff directory
    #[command(subcommand)]
    Staff(StaffCommand),

    /// Manage staff rate rows
    #[command(subcommand)]
    Rates(RatesCommand),

    /// Import a schedule spreadsheet for one month
    Import {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// JSON file assigning unresolved spreadsheet names to staff ids
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Store the sessions; without this the import is a dry run
        #[arg(long)]
        commit: bool,
    },

    /// Inspect stored sessions
    #[command(subcommand)]
    Sessions(SessionsCommand),

    /// Cost per staff member for one month
    Summary {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum StaffCommand {
    Add { display_name: String },
    List,
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum RatesCommand {
    /// Load rate rows from a JSON array
    Import {
        #[arg(long)]
        file: PathBuf,
    },
    List {
        #[arg(long)]
        staff: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionsCommand {
    List {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },
    Delete { id: String },
}

/// Either a list of `{excelName, systemStaffId}` or a plain name -> id object.
#[derive(Deserialize)]
#[serde(untagged)]
enum MappingFile {
    List(Vec<StaffNameMapping>),
    Map(HashMap<String, String>),
}

impl MappingFile {
    fn into_mappings(self) -> Vec<StaffNameMapping> {
        match self {
            MappingFile::List(mappings) => mappings,
            MappingFile::Map(map) => map
                .into_iter()
                .map(|(excel_name, system_staff_id)| StaffNameMapping {
                    excel_name,
                    system_staff_id,
                })
                .collect(),
        }
    }
}

pub async fn execute(cli: Cli) -> Result<()> {
    let db = Database::new(cli.db.clone())?;

    match cli.command {
        Command::Staff(command) => staff(&db, command).await,
        Command::Rates(command) => rates(&db, command).await,
        Command::Import {
            file,
            month,
            year,
            mapping,
            commit,
        } => {
            let settings = SettingsStore::new(cli.settings.clone())?;
            import(&db, &settings, file, month, year, mapping, commit).await
        }
        Command::Sessions(command) => sessions(&db, command).await,
        Command::Summary { month, year, json } => {
            let summary = db.financial_summary(month, year).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            Ok(())
        }
    }
}

async fn staff(db: &Database, command: StaffCommand) -> Result<()> {
    match command {
        StaffCommand::Add { display_name } => {
            let entry = db.insert_staff(&display_name).await?;
            println!("{}\t{}", entry.id, entry.display_name);
        }
        StaffCommand::List => {
            for entry in db.list_staff_directory().await? {
                println!("{}\t{}", entry.id, entry.display_name);
            }
        }
        StaffCommand::Remove { id } => {
            if !db.delete_staff(&id).await? {
                bail!("no staff member with id {id}");
            }
        }
    }
    Ok(())
}

async fn rates(db: &Database, command: RatesCommand) -> Result<()> {
    match command {
        RatesCommand::Import { file } => {
            let contents = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let rows: Vec<ClinicalStaffRates> = serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse rate rows in {}", file.display()))?;
            for row in &rows {
                let id = db
                    .insert_rates(row)
                    .await
                    .with_context(|| format!("failed to store rates for staff {}", row.staff_id))?;
                log::info!("Stored rates {id} for staff {}", row.staff_id);
            }
            println!("{} rate row(s) stored", rows.len());
        }
        RatesCommand::List { staff } => {
            let rows = match staff {
                Some(staff_id) => db.list_rates_for_staff(&staff_id).await?,
                None => db.list_rates().await?,
            };
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

async fn sessions(db: &Database, command: SessionsCommand) -> Result<()> {
    match command {
        SessionsCommand::List { month, year } => {
            let records = db.list_sessions_for_period(month, year).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        SessionsCommand::Delete { id } => {
            if !db.delete_session(&id).await? {
                bail!("no session with id {id}");
            }
        }
    }
    Ok(())
}

async fn import(
    db: &Database,
    settings: &SettingsStore,
    file: PathBuf,
    month: u32,
    year: i32,
    mapping: Option<PathBuf>,
    commit: bool,
) -> Result<()> {
    let bytes = fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
    let directory = db.list_staff_directory().await?;
    if directory.is_empty() {
        bail!("staff directory is empty; add staff before importing");
    }

    let controller = ImportController::new(
        db.clone(),
        directory.clone(),
        settings.import_config()?,
        month,
        year,
    );

    let mut phase = controller.load(&bytes, &WorkbookDecoder).await?;

    if phase == ImportPhase::AwaitingManualMapping {
        let unresolved = controller.unresolved_names().await;
        let Some(mapping_path) = mapping else {
            print_mapping_template(&unresolved);
            bail!("{} staff name(s) need a mapping; pass --mapping", unresolved.len());
        };

        let contents = fs::read_to_string(&mapping_path)
            .with_context(|| format!("failed to read {}", mapping_path.display()))?;
        let mappings = serde_json::from_str::<MappingFile>(&contents)
            .with_context(|| format!("failed to parse mappings in {}", mapping_path.display()))?
            .into_mappings();

        phase = match controller.submit_mappings(&mappings).await {
            Ok(phase) => phase,
            Err(ImportError::IncompleteMapping(missing)) => {
                print_mapping_template(&missing);
                bail!("{} staff name(s) are still unmapped", missing.len());
            }
            Err(err) => return Err(err.into()),
        };
    }

    debug_assert_eq!(phase, ImportPhase::AwaitingConfirmation);
    print_preview(db, &controller.sessions().await, &directory).await?;

    if !commit {
        println!("Dry run; pass --commit to store these sessions.");
        return Ok(());
    }

    let summary = controller.confirm().await?;
    println!(
        "Stored {}/{} sessions.",
        summary.committed.len(),
        summary.attempted
    );
    for failure in &summary.failed {
        eprintln!(
            "  session {} (staff {}) failed: {}",
            failure.index, failure.staff_id, failure.error
        );
    }
    if !summary.is_complete() {
        bail!("{} session(s) could not be stored", summary.failed.len());
    }
    Ok(())
}

fn print_mapping_template(names: &[String]) {
    let template: HashMap<&str, &str> = names.iter().map(|name| (name.as_str(), "")).collect();
    eprintln!("Unresolved staff names (fill in staff ids):");
    eprintln!(
        "{}",
        serde_json::to_string_pretty(&template).unwrap_or_default()
    );
}

async fn print_preview(
    db: &Database,
    sessions: &[ClinicalSession],
    directory: &[StaffDirectoryEntry],
) -> Result<()> {
    let rates = select_current_rates(&db.list_rates().await?);
    let names: HashMap<&str, &str> = directory
        .iter()
        .map(|entry| (entry.id.as_str(), entry.display_name.as_str()))
        .collect();

    let mut total = 0.0;
    for session in sessions {
        let cost = session_cost(session, rates.get(&session.staff_id));
        total += cost;
        println!(
            "{:<24} {:<4} {:<10} {:<8} {:>4}m x{:<3} {:>10.2}",
            names.get(session.staff_id.as_str()).copied().unwrap_or(session.staff_id.as_str()),
            session.clinic_type.as_str(),
            session.meeting_type.as_str(),
            session.show_status.as_str(),
            session.duration_minutes,
            session.count,
            cost
        );
    }
    println!("{} session group(s), estimated cost {:.2}", sessions.len(), total);
    Ok(())
}

fn print_summary(summary: &FinancialSummary) {
    println!("Summary {:02}/{}", summary.month, summary.year);
    for line in &summary.lines {
        println!(
            "{:<24} sessions {:>4} (no-show {:>3}) {:>10.2}{}",
            line.display_name.as_deref().unwrap_or(line.staff_id.as_str()),
            line.session_count,
            line.no_show_count,
            line.total_cost,
            if line.rates_missing { "  [rates missing]" } else { "" }
        );
    }
    println!(
        "Total: {} sessions, {:.2}",
        summary.session_count, summary.total_cost
    );
    for warning in &summary.warnings {
        eprintln!("warning: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_arguments() {
        let cli = Cli::try_parse_from([
            "clinic-finance",
            "--db",
            "/tmp/x.sqlite3",
            "import",
            "--file",
            "march.xlsx",
            "--month",
            "3",
            "--year",
            "2024",
            "--commit",
        ])
        .unwrap();

        assert_eq!(cli.db, PathBuf::from("/tmp/x.sqlite3"));
        match cli.command {
            Command::Import {
                file,
                month,
                year,
                mapping,
                commit,
            } => {
                assert_eq!(file, PathBuf::from("march.xlsx"));
                assert_eq!((month, year), (3, 2024));
                assert!(mapping.is_none());
                assert!(commit);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn mapping_files_accept_both_shapes() {
        let list: MappingFile = serde_json::from_str(
            r#"[{"excelName": "Zzz Qqq", "systemStaffId": "s1"}]"#,
        )
        .unwrap();
        assert_eq!(
            list.into_mappings(),
            vec![StaffNameMapping {
                excel_name: "Zzz Qqq".into(),
                system_staff_id: "s1".into()
            }]
        );

        let map: MappingFile = serde_json::from_str(r#"{"Zzz Qqq": "s1"}"#).unwrap();
        assert_eq!(map.into_mappings().len(), 1);
    }
}
