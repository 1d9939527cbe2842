#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use vc_console::output;
use vc_console::{Clinic, ConsoleConfig, ConsoleError, Controller, SaveOutcome, logging};
use vc_core::search::FieldFilter;
use vc_core::summary::{finance_summary, stock_level};
use vc_core::{EntityKind, RecordId};

#[derive(Parser)]
#[command(name = "vc_console")]
#[command(about = "Veterinary clinic records console")]
#[command(
    after_help = "Environment:\n  VC_LOG            Log filter (falls back to RUST_LOG)\n  VC_STORAGE_DIR    Storage directory"
)]
struct Cli {
    #[command(flatten)]
    config: ConsoleConfig,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Describe every entity and its fields.
    Entities,
    List {
        entity: String,
        #[arg(long, default_value = "")]
        search: String,
        /// Exact match on one field, e.g. `status=pendente`.
        #[arg(long = "where")]
        filter: Option<String>,
    },
    Show {
        entity: String,
        id: String,
    },
    Add {
        entity: String,
        /// `field=value` pairs, applied in order.
        assignments: Vec<String>,
        /// Toggle a member id in the record's selection (repeatable).
        #[arg(long = "member")]
        members: Vec<String>,
    },
    Edit {
        entity: String,
        id: String,
        assignments: Vec<String>,
        #[arg(long = "member")]
        members: Vec<String>,
    },
    Delete {
        entity: String,
        id: String,
    },
    FinanceSummary,
    StockStatus,
    /// Show the clinic's contact details.
    ClinicInfo,
    /// Update the clinic's contact details with `field=value` pairs.
    SetClinicInfo { assignments: Vec<String> },
    /// Database location and per-collection revisions.
    StorageStatus,
    /// Erase every persisted collection.
    ClearAll,
    /// Printable report for one record (not available yet).
    Print {
        entity: String,
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.config.log_json);

    match run(cli).await {
        Ok(value) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            );
            ExitCode::SUCCESS
        }
        Err(ConsoleError::Rejected(errors)) => {
            let body = json!({ "rejected": output::errors_json(&errors) });
            println!("{body:#}");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Value, ConsoleError> {
    if let Command::Entities = cli.command {
        return Ok(output::entities_json());
    }

    let clinic = Arc::new(Clinic::open(&cli.config)?);
    match cli.command {
        Command::Entities => Ok(output::entities_json()),
        Command::List {
            entity,
            search,
            filter,
        } => {
            let controller = clinic.controller(parse_entity(&entity)?)?;
            let filter = filter
                .as_deref()
                .map(|raw| {
                    FieldFilter::parse(raw)
                        .ok_or_else(|| ConsoleError::InvalidAssignment(raw.to_string()))
                })
                .transpose()?;
            let hits = controller.search_filtered(&search, filter.as_ref());
            Ok(output::records_json(controller.schema(), &hits))
        }
        Command::Show { entity, id } => {
            let controller = clinic.controller(parse_entity(&entity)?)?;
            let id = parse_id(&id)?;
            let record = controller
                .find(&id)
                .ok_or_else(|| vc_console::ControllerError::UnknownRecord {
                    entity: controller.schema().singular,
                    id: id.to_string(),
                })?;
            let mut body = output::record_json(controller.schema(), &record);
            if controller.schema().group.is_some() {
                body["members"] = output::members_json(&controller.group_members(&record)?);
            }
            Ok(body)
        }
        Command::Add {
            entity,
            assignments,
            members,
        } => {
            let controller = clinic.controller(parse_entity(&entity)?)?;
            controller.open_create();
            compose(&controller, &assignments, &members)?;
            finish_save(&controller).await
        }
        Command::Edit {
            entity,
            id,
            assignments,
            members,
        } => {
            let controller = clinic.controller(parse_entity(&entity)?)?;
            controller.open_edit(&parse_id(&id)?)?;
            compose(&controller, &assignments, &members)?;
            finish_save(&controller).await
        }
        Command::Delete { entity, id } => {
            let controller = clinic.controller(parse_entity(&entity)?)?;
            let notice = controller.delete(&parse_id(&id)?)?;
            Ok(json!({ "notice": notice.to_string(), "detail": notice }))
        }
        Command::FinanceSummary => {
            let records = clinic.store(EntityKind::Transaction)?.records();
            Ok(output::finance_json(&finance_summary(&records)))
        }
        Command::StockStatus => {
            let records = clinic.store(EntityKind::Product)?.records();
            let rows = records
                .iter()
                .map(|product| (product.clone(), stock_level(product)))
                .collect::<Vec<_>>();
            Ok(output::stock_json(&rows))
        }
        Command::ClinicInfo => Ok(output::clinic_info_json(&clinic.clinic_info()?)),
        Command::SetClinicInfo { assignments } => {
            let mut info = clinic.clinic_info()?;
            for assignment in &assignments {
                let (field, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| ConsoleError::InvalidAssignment(assignment.clone()))?;
                info.set(field.trim(), value)
                    .map_err(|err| ConsoleError::UnknownSetting(err.message()))?;
            }
            let notice = clinic.save_clinic_info(&info)?;
            Ok(json!({
                "notice": notice.to_string(),
                "clinic_info": output::clinic_info_json(&info),
            }))
        }
        Command::StorageStatus => {
            let (db_path, rows) = clinic.storage_status()?;
            Ok(output::storage_json(&db_path, &rows))
        }
        Command::ClearAll => {
            let removed = clinic.clear_all()?;
            Ok(json!({ "cleared_collections": removed }))
        }
        Command::Print { entity, id } => {
            let controller = clinic.controller(parse_entity(&entity)?)?;
            let id = parse_id(&id)?;
            Ok(json!({
                "entity": controller.schema().kind.as_str(),
                "id": id.as_str(),
                "printed": false,
                "reason": "printable reports are not implemented",
            }))
        }
    }
}

fn compose(
    controller: &Controller,
    assignments: &[String],
    members: &[String],
) -> Result<(), ConsoleError> {
    for assignment in assignments {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConsoleError::InvalidAssignment(assignment.clone()))?;
        controller.update_field(field.trim(), value)?;
    }
    for member in members {
        controller.toggle_member(parse_id(member)?)?;
    }
    Ok(())
}

async fn finish_save(controller: &Controller) -> Result<Value, ConsoleError> {
    match controller.save().await? {
        SaveOutcome::Saved { id, notice } => Ok(json!({
            "id": id.as_str(),
            "notice": notice.to_string(),
            "detail": notice,
        })),
        SaveOutcome::Rejected(errors) => Err(ConsoleError::Rejected(errors)),
        SaveOutcome::Cancelled => Err(ConsoleError::Cancelled),
    }
}

fn parse_entity(raw: &str) -> Result<EntityKind, ConsoleError> {
    EntityKind::parse(raw).ok_or_else(|| ConsoleError::UnknownEntity(raw.to_string()))
}

fn parse_id(raw: &str) -> Result<RecordId, ConsoleError> {
    RecordId::try_new(raw).map_err(|err| ConsoleError::InvalidId(err.message()))
}
