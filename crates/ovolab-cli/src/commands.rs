//! Command dispatch and handlers.
//!
//! Handlers write their output to a caller-supplied writer; only prompts
//! read from stdin.

use anyhow::{Result, bail};
use std::io::{self, BufRead, Write};
use std::path::Path;

use ovolab_client::{ApiClient, ClientConfig, delete_transferencia_session};
use ovolab_core::grouping::GfeGrouping;
use ovolab_core::report::{opu_report, transferencia_report};
use ovolab_core::types::DonadoraFilter;
use ovolab_core::{DonadoraStore, DonorLookup, RecordId};

use crate::cli::{
    Cli, Command, DonadorasAction, DraftsAction, GfeAction, OpuAction, ReportKind, SessionsAction,
    TransferenciaAction,
};
use crate::config_handlers::handle_config_command;
use crate::render;

/// Runs one parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    execute(cli, &mut stdout.lock()).await
}

async fn execute(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Config { action } => handle_config_command(config_path, &action, out),
        command => {
            let config = ClientConfig::load(config_path)?;
            let client = ApiClient::new(&config)?;
            tracing::debug!(api = %client.base_url(), "client ready");
            dispatch(&client, command, out).await
        }
    }
}

async fn dispatch(client: &ApiClient, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Login { usuario, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_line("Password: ", &mut io::stdin().lock())?,
            };
            let user = client.login(&usuario, &password).await?;
            writeln!(out, "Logged in as {} ({})", user.usuario, user.rol)?;
        }
        Command::Logout => {
            client.logout();
            writeln!(out, "Logged out")?;
        }
        Command::Whoami => {
            require_session(client)?;
            let user = client.me().await?;
            write!(out, "{}", render::usuario(&user))?;
        }
        Command::Health => {
            let status = client.health().check().await?;
            write!(out, "{}", render::health(&status))?;
            if !status.is_healthy() {
                bail!("backend is {}", status.status);
            }
        }
        Command::Donadoras { action } => donadoras(client, action, out).await?,
        Command::Opu {
            action: OpuAction::Sessions,
        } => {
            let sesiones = client.opu().list().await?;
            write!(out, "{}", render::opu_sessions(&sesiones))?;
        }
        Command::Fecundacion {
            action: SessionsAction::Sessions { detail },
        } => {
            let registros = client.fecundaciones().list().await?;
            write!(out, "{}", render::fecundacion_sessions_text(&registros, detail))?;
        }
        Command::Transferencia {
            action:
                TransferenciaAction::Sessions {
                    by_technician: true,
                    ..
                },
        } => {
            let sesiones = client.sesiones_transferencia().list().await?;
            write!(out, "{}", render::transferencia_days_text(&sesiones))?;
        }
        Command::Transferencia {
            action: TransferenciaAction::Sessions { detail, .. },
        } => {
            let sesiones = client.sesiones_transferencia().list().await?;
            let donors = if detail {
                Some(donor_lookup(client).await?)
            } else {
                None
            };
            write!(
                out,
                "{}",
                render::transferencia_sessions_text(&sesiones, donors.as_ref())
            )?;
        }
        Command::Gfe {
            action: GfeAction::Sessions { by, detail },
        } => {
            let chequeos = client.gfe().list().await?;
            let by = GfeGrouping::from(by);
            write!(out, "{}", render::gfe_sessions_text(&chequeos, by, detail))?;
        }
        Command::Report { kind } => report(client, kind, out).await?,
        Command::DeleteSession { id, yes } => {
            delete_session(client, id, yes, &mut io::stdin().lock(), out).await?;
        }
        Command::Drafts { action } => drafts(client, action, out).await?,
        Command::Config { .. } => bail!("config commands do not use the API client"),
    }
    Ok(())
}

/// The message printed for a failed command.
pub fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ovolab_client::Error>() {
        Some(e) if e.is_unauthorized() => {
            format!("{} (run `ovolab login` to sign in again)", e.user_message())
        }
        Some(e) => e.user_message(),
        None => format!("{err:#}"),
    }
}

fn require_session(client: &ApiClient) -> Result<()> {
    if !client.session().is_authenticated() {
        bail!("not logged in (run `ovolab login`)");
    }
    Ok(())
}

async fn donor_lookup(client: &ApiClient) -> Result<DonorLookup> {
    let store = DonadoraStore::new(client.donadoras().all().await?);
    tracing::debug!(donadoras = store.len(), "donor lookup loaded");
    Ok(store.lookup())
}

// ============================================================================
// Donadoras
// ============================================================================

async fn donadoras(client: &ApiClient, action: DonadorasAction, out: &mut impl Write) -> Result<()> {
    match action {
        DonadorasAction::List {
            page,
            search,
            raza,
            activo,
        } => {
            let mut filter = DonadoraFilter::default().page(page);
            if let Some(q) = search {
                filter = filter.search(q);
            }
            filter.raza = raza;
            filter.activo = activo;
            let page = client.donadoras().list(&filter).await?;
            write!(out, "{}", render::donadoras_page(&page))?;
        }
        DonadorasAction::Stats => {
            let stats = client.donadoras().stats().await?;
            write!(out, "{}", render::donadora_stats(&stats))?;
        }
        DonadorasAction::Export { activo, out: target } => {
            let csv = client.donadoras().export_csv(activo).await?;
            match target {
                Some(path) => {
                    write_file(&path, &csv).await?;
                    writeln!(out, "Donors exported to {}", path.display())?;
                }
                None => write!(out, "{csv}")?,
            }
        }
    }
    Ok(())
}

// ============================================================================
// Reports
// ============================================================================

async fn report(client: &ApiClient, kind: ReportKind, out: &mut impl Write) -> Result<()> {
    let (html, target) = match kind {
        ReportKind::Opu { id, out: target } => {
            let sesion = client.opu().get(id).await?;
            let donors = donor_lookup(client).await?;
            (opu_report(&sesion, &donors), target)
        }
        ReportKind::Transferencia { id, out: target } => {
            let sesion = client.sesiones_transferencia().get(id).await?;
            let donors = donor_lookup(client).await?;
            (transferencia_report(&sesion, &donors), target)
        }
    };
    match target {
        Some(path) => {
            write_file(&path, &html).await?;
            writeln!(out, "Report written to {}", path.display())?;
        }
        None => write!(out, "{html}")?,
    }
    Ok(())
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}

// ============================================================================
// Session deletion
// ============================================================================

async fn delete_session(
    client: &ApiClient,
    id: RecordId,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let sesion = client.sesiones_transferencia().get(id).await?;
    let count = sesion.transferencias_realizadas.len();
    if !yes {
        let prompt = format!(
            "Delete transfer session #{id} ({} {}) and its {count} transfer(s)? [y/N] ",
            sesion.fecha, sesion.tecnico_transferencia
        );
        write!(out, "{prompt}")?;
        out.flush()?;
        if !confirmed(&read_line(input)?) {
            writeln!(out, "Cancelled")?;
            return Ok(());
        }
    }

    let report = delete_transferencia_session(client, &sesion).await?;
    writeln!(out, "{report}")?;
    if !report.is_complete() {
        bail!("transfer session #{id} was only partially deleted");
    }
    Ok(())
}

fn confirmed(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}

fn read_line(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn prompt_line(prompt: &str, input: &mut impl BufRead) -> Result<String> {
    eprint!("{prompt}");
    io::stderr().flush()?;
    let line = read_line(input)?;
    if line.is_empty() {
        bail!("no password given");
    }
    Ok(line)
}

// ============================================================================
// Drafts
// ============================================================================

async fn drafts(client: &ApiClient, action: DraftsAction, out: &mut impl Write) -> Result<()> {
    match action {
        DraftsAction::List { modulo, tipo } => {
            let drafts = client
                .drafts()
                .list(modulo.as_deref(), tipo.as_deref())
                .await?;
            write!(out, "{}", render::drafts(&drafts))?;
        }
        DraftsAction::Discard { id } => {
            client.drafts().delete(id).await?;
            writeln!(out, "Draft #{id} discarded")?;
        }
    }
    Ok(())
}
