//! Command handlers.

use std::fs;
use std::io::{self, Read};

use sanpo::{Draw, LocalState, Sanpo, SuggestionKind, TaskGroup};

use crate::cli::{Command, GroupCommand, TaskCommand};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Execute one command, updating local state in place.
pub async fn run(client: &Sanpo, state: &mut LocalState, command: Command) -> CommandResult {
    match command {
        Command::Where { group } => draw(client, state, SuggestionKind::Where, group).await,
        Command::What { group } => draw(client, state, SuggestionKind::What, group).await,
        Command::Current => {
            print_current(state);
            Ok(())
        }
        Command::History { clear } => history(client, clear).await,
        Command::Groups { mine } => groups(client, state, mine).await,
        Command::Group(cmd) => group(client, state, cmd).await,
        Command::Task(cmd) => task(client, cmd).await,
    }
}

async fn draw(
    client: &Sanpo,
    state: &mut LocalState,
    kind: SuggestionKind,
    group: Option<String>,
) -> CommandResult {
    let Draw {
        suggestion,
        recording,
    } = match group {
        Some(id) => client.draw(&mut state.selection, kind, Some(id.as_str())).await,
        None => client.draw_into(state, kind).await,
    };

    match suggestion {
        Some(s) => println!("{}: {}", label(kind), s.content),
        None => println!("{}: nothing to suggest yet", label(kind)),
    }

    // The process is about to exit, so let the history write land.
    if let Some(handle) = recording {
        let _ = handle.await;
    }

    Ok(())
}

fn label(kind: SuggestionKind) -> &'static str {
    match kind {
        SuggestionKind::Where => "Where",
        SuggestionKind::What => "What",
    }
}

fn print_current(state: &LocalState) {
    for kind in [SuggestionKind::Where, SuggestionKind::What] {
        match state.selection.get(kind) {
            Some(s) => println!("{}: {}", label(kind), s.content),
            None => println!("{}: -", label(kind)),
        }
    }
    match state.active_group() {
        Some(g) => println!("Group: {}", g.name),
        None => match &state.active_group_id {
            Some(id) => println!("Group: {id}"),
            None => println!("Group: all"),
        },
    }
}

async fn history(client: &Sanpo, clear: bool) -> CommandResult {
    if clear {
        if client.clear_history().await {
            println!("History cleared");
        } else {
            return Err("could not clear history".into());
        }
        return Ok(());
    }

    let entries = client.history().await;
    if entries.is_empty() {
        println!("No history yet");
    }
    for entry in entries {
        println!(
            "{}  {} / {}",
            entry.created_at, entry.where_to_go, entry.what_to_do
        );
    }
    Ok(())
}

fn print_group(group: &TaskGroup, active: Option<&str>) {
    let marker = if active == Some(group.id.as_str()) { "*" } else { " " };
    let scope = if group.is_default { "shared" } else { "mine" };
    println!("{marker} {}  {} ({scope})", group.id, group.name);
    if let Some(description) = group.description.as_deref().filter(|d| !d.is_empty()) {
        println!("    {description}");
    }
}

async fn groups(client: &Sanpo, state: &mut LocalState, mine: bool) -> CommandResult {
    let listed = if mine {
        client.user_groups().await
    } else {
        client.refresh_groups(state).await;
        state.cached_groups.clone()
    };

    if listed.is_empty() {
        println!("No task groups");
    }
    for g in &listed {
        print_group(g, state.active_group_id.as_deref());
    }
    Ok(())
}

async fn group(client: &Sanpo, state: &mut LocalState, command: GroupCommand) -> CommandResult {
    match command {
        GroupCommand::Create { name, description } => {
            let group = client
                .create_group(&name, description.as_deref())
                .await
                .ok_or("could not create group")?;
            println!("Created {} ({})", group.name, group.id);
        }
        GroupCommand::Delete { id } => {
            if !client.delete_group(&id).await {
                return Err(format!("could not delete group {id}").into());
            }
            client.refresh_groups(state).await;
            println!("Deleted {id}");
        }
        GroupCommand::Tasks { id } => {
            let tasks = client.group_tasks(&id).await;
            if tasks.is_empty() {
                println!("No tasks");
            }
            for t in tasks {
                let off = if t.is_active { "" } else { " (disabled)" };
                let category = t.category.as_deref().unwrap_or("-");
                println!("{}  [{}] {} #{category}{off}", t.id, t.kind, t.content);
            }
        }
        GroupCommand::Add {
            id,
            kind,
            content,
            category,
        } => {
            let task = client
                .add_task(&id, kind, &content, category.as_deref())
                .await
                .ok_or("could not add task")?;
            println!("Added {} ({})", task.content, task.id);
        }
        GroupCommand::Use { id } => {
            state.set_active_group(id);
            client.refresh_groups(state).await;
            print_current(state);
        }
        GroupCommand::Export { id, qr } => {
            let text = if qr {
                client.export_group_qr(&id).await?
            } else {
                client
                    .export_group(&id)
                    .await
                    .ok_or_else(|| format!("could not export group {id}"))?
            };
            println!("{text}");
        }
        GroupCommand::Import { file } => {
            let text = match file {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let report = client.import_group(&text).await?;
            println!(
                "Imported {} task(s) into {} ({})",
                report.imported, report.group.name, report.group.id
            );
            if !report.is_complete() {
                println!("{} task(s) could not be imported", report.failed);
            }
            client.refresh_groups(state).await;
        }
    }
    Ok(())
}

async fn task(client: &Sanpo, command: TaskCommand) -> CommandResult {
    let (id, ok) = match command {
        TaskCommand::Delete { id } => {
            let ok = client.delete_task(&id).await;
            (id, ok)
        }
        TaskCommand::Enable { id } => {
            let ok = client.set_task_active(&id, true).await;
            (id, ok)
        }
        TaskCommand::Disable { id } => {
            let ok = client.set_task_active(&id, false).await;
            (id, ok)
        }
    };

    if !ok {
        return Err(format!("could not update task {id}").into());
    }
    println!("Updated {id}");
    Ok(())
}
