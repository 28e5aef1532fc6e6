use std::io;

use crate::client::HTTPClient;
use crate::models::{CLIConfig, ChatMessage};
use crate::render;

pub struct REPL {
    pub config: CLIConfig,
    pub client: HTTPClient,
    pub history: Vec<ChatMessage>,
}

impl REPL {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self {
            config,
            client,
            history: Vec::new(),
        }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        loop {
            render::prompt();
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            self.send(&line);
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let (cmd, rest) = split_command(line);
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "state" => self.show_state(),
            "add" => {
                if rest.is_empty() {
                    render::error("usage: /add <task>");
                } else {
                    match self.client.add_task(rest) {
                        Ok(task) => render::info(&format!("added '{}'", task.description)),
                        Err(err) => render::error(&err),
                    }
                }
            }
            "rm" => self.remove(rest),
            "fill" => match self.client.fill() {
                Ok(outcome) => render::fill(&outcome),
                Err(err) => render::error(&err),
            },
            "clear" => match self.client.clear() {
                Ok(resp) => render::info(&format!("Cleared {} tasks.", resp.moved)),
                Err(err) => render::error(&err),
            },
            "debug" => {
                if rest.is_empty() {
                    self.config.debug = !self.config.debug;
                    render::info(&format!("debug: {}", self.config.debug));
                } else if let Some(flag) = parse_on_off(rest) {
                    self.config.debug = flag;
                    render::info(&format!("debug: {}", self.config.debug));
                } else {
                    render::error("invalid debug flag");
                }
            }
            "history" => render::history(&self.history),
            "reset" => {
                self.history.clear();
                render::info("history cleared");
            }
            "config" => render::config(&self.config),
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.base_url));
                } else {
                    self.config.base_url = rest.to_string();
                    self.rebuild_client();
                    render::info("base url updated");
                }
            }
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    fn rebuild_client(&mut self) {
        match HTTPClient::new(&self.config.base_url) {
            Ok(client) => self.client = client,
            Err(err) => render::error(&err),
        }
    }

    fn send(&mut self, line: &str) {
        self.history.push(ChatMessage {
            role: "user".to_string(),
            content: line.to_string(),
        });

        match self.client.chat(line) {
            Ok(resp) => {
                if !resp.reply.is_empty() {
                    self.history.push(ChatMessage {
                        role: "echo".to_string(),
                        content: resp.reply.clone(),
                    });
                }
                render::reply(&resp, self.config.debug);
                if resp.success && resp.action.is_some() {
                    self.show_state();
                }
            }
            Err(err) => render::error(&err),
        }
    }

    fn show_state(&self) {
        match self.client.state() {
            Ok(state) => render::state(&state),
            Err(err) => render::error(&err),
        }
    }

    /// Accepts a 1-based backlog position as shown by `/state`, or a raw id.
    fn remove(&self, target: &str) {
        if target.is_empty() {
            render::error("usage: /rm <n|id>");
            return;
        }
        let id = match target.parse::<usize>() {
            Ok(position) => match self.client.state() {
                Ok(state) => match position.checked_sub(1).and_then(|idx| state.backlog.get(idx)) {
                    Some(task) => task.id.clone(),
                    None => {
                        render::error("no backlog task at that position");
                        return;
                    }
                },
                Err(err) => {
                    render::error(&err);
                    return;
                }
            },
            Err(_) => target.to_string(),
        };
        match self.client.remove_task(&id) {
            Ok(resp) if resp.removed => render::info("removed"),
            Ok(_) => render::info("not in backlog"),
            Err(err) => render::error(&err),
        }
    }
}

fn split_command(line: &str) -> (&str, &str) {
    let mut parts = line.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("").trim_start_matches('/');
    let rest = parts.next().unwrap_or("").trim();
    (cmd, rest)
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
