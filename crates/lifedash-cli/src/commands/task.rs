use clap::Subcommand;
use lifedash_core::{Config, Event, Task};
use uuid::Uuid;

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Assign the current task slot
    Set { name: String },
    /// Add a task to the waiting queue
    Queue { name: String },
    /// Complete the current task and promote the next queued one
    Done,
    /// Delete a task by id
    Remove { id: Uuid },
    /// List the current task and the queue
    List {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let config = Config::load()?;
    let mut engine = common::load_engine(&config);

    match action {
        TaskAction::Set { name } => {
            let task = Task::new(&name)?;
            println!("current task: {}", task.name);
            if let Some(displaced) = engine.set_current_task(task) {
                println!("displaced: {}", displaced.name);
            }
        }
        TaskAction::Queue { name } => {
            let task = Task::new(&name)?;
            let label = task.name.clone();
            engine.enqueue_task(task)?;
            match engine.tasks().current() {
                Some(current) if current.name == label => {
                    println!("current task: {label}")
                }
                _ => println!(
                    "queued: {label} ({}/{} waiting)",
                    engine.tasks().queued_len(),
                    engine.tasks().max_queued()
                ),
            }
        }
        TaskAction::Done => {
            if engine.tasks().current().is_none() {
                println!("no current task");
            } else {
                match engine.complete_current_task() {
                    Some(Event::TaskPromoted { task_name, .. }) => {
                        println!("done; next up: {task_name}")
                    }
                    _ => println!("done; queue empty"),
                }
            }
        }
        TaskAction::Remove { id } => {
            if engine.remove_task(id) {
                println!("removed {id}");
            } else {
                println!("no task with id {id}");
            }
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(engine.tasks())?);
            } else {
                match engine.tasks().current() {
                    Some(task) => println!("* {} ({})", task.name, task.id),
                    None => println!("* (no current task)"),
                }
                for task in engine.tasks().queued() {
                    println!("  {} ({})", task.name, task.id);
                }
            }
        }
    }

    common::save_engine(&engine)
}
