use std::io::{self, Write};

use crate::models::{CLIConfig, ChatMessage, ChatResponse, FillInfo, ScheduleInfo, StateInfo, TaskInfo};

pub fn banner(cfg: &CLIConfig) {
    println!("Echo Debug CLI");
    println!("API: {}", cfg.base_url);
    println!("How is your energy? Type /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                 Show commands");
    println!("  /exit | /quit          Exit");
    println!("  /state                 Show timeline and backlog");
    println!("  /add <task>            Add a task to the backlog");
    println!("  /rm <n|id>             Remove a backlog task by position or id");
    println!("  /fill                  Move the oldest backlog task onto the timeline");
    println!("  /clear                 Return unlocked timeline tasks to the backlog");
    println!("  /debug [on|off]        Toggle debug output");
    println!("  /history               Show chat history");
    println!("  /reset                 Clear chat history");
    println!("  /config                Show current config");
    println!("  /base <url>            Update base URL");
}

pub fn reply(resp: &ChatResponse, debug: bool) {
    if !resp.success {
        if !resp.reply.is_empty() {
            println!("echo> {}", resp.reply);
        }
        if let Some(err) = &resp.error {
            println!("error: {}", err);
        }
        return;
    }
    println!("echo> {}", resp.reply);
    if debug {
        println!(
            "intent: {}  action: {}",
            resp.intent.clone().unwrap_or_default(),
            resp.action.clone().unwrap_or_default()
        );
    }
}

pub fn state(state: &StateInfo) {
    println!("Today's timeline:");
    match &state.schedule {
        ScheduleInfo::Slots { slots } => {
            for slot in slots {
                match (&slot.task, slot.locked) {
                    (Some(task), true) => println!("  {} | {} [locked]", slot.label, task.description),
                    (Some(task), false) => println!("  {} | {}", slot.label, task.description),
                    (None, _) => println!("  {} | Free Slot", slot.label),
                }
            }
        }
        ScheduleInfo::Active { tasks } => {
            if tasks.is_empty() {
                println!("  nothing active");
            }
            for task in tasks {
                println!("  * {}", task.description);
            }
        }
    }
    backlog(&state.backlog);
}

pub fn backlog(tasks: &[TaskInfo]) {
    println!("Backlog:");
    if tasks.is_empty() {
        println!("  Backlog is empty!");
        return;
    }
    for (idx, task) in tasks.iter().enumerate() {
        println!("  {}. {} ({})", idx + 1, task.description, task.id);
    }
}

pub fn fill(outcome: &FillInfo) {
    match outcome {
        FillInfo::Placed { task, slot: Some(slot) } => {
            println!("Scheduled '{}' at {}", task.description, slot)
        }
        FillInfo::Placed { task, slot: None } => println!("Scheduled '{}'", task.description),
        FillInfo::Exhausted { reason } => println!("Nothing moved: {}", exhaustion_text(reason)),
    }
}

fn exhaustion_text(reason: &str) -> &str {
    match reason {
        "backlog_empty" => "Backlog empty",
        "calendar_full" => "Calendar Full",
        other => other,
    }
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    println!("  debug: {}", cfg.debug);
}

pub fn history(items: &[ChatMessage]) {
    if items.is_empty() {
        println!("no history");
        return;
    }
    for msg in items {
        println!("{}> {}", msg.role, msg.content);
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
