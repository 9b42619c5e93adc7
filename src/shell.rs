//! Interactive command loop.
//!
//! One command runs to completion before the next is read; a failing
//! command reports and never tears the loop down.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::debug;

use crate::cluster::{self, DiscoverError, FetchPolicy, IdClaim};
use crate::config::LoadError;
use crate::connect::{self, ConnectError};
use crate::output;
use crate::session::Session;

const COMMANDS: &[(&str, &str)] = &[
    ("cluster", "enumerate brokers and their configuration"),
    ("config", "show current configuration"),
    ("connect", "create consumer and admin client"),
    ("disconnect", "close consumer and admin client"),
    ("exit", "exit the shell"),
    ("help", "show this help message"),
    ("load <file>", "load kafka config from json file"),
];

/// The read-evaluate-report loop driving one [`Session`].
#[derive(Debug, Default)]
pub struct Shell {
    session: Session,
    policy: FetchPolicy,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            policy: FetchPolicy::default(),
        }
    }

    /// Load a configuration file into the session, reporting the outcome.
    ///
    /// Shared between the `-c` startup path and the `load` command.
    pub fn load(&mut self, path: &Path) {
        match self.session.config.load(path) {
            Ok(delta) => {
                output::ok("Loaded configuration from file:");
                println!();
                println!(
                    "{}",
                    output::config_table(delta.iter().map(|(key, value)| (key.as_str(), value)))
                );
            }
            Err(error @ (LoadError::Read { .. } | LoadError::Parse { .. })) => {
                debug!(%error, "configuration load failed");
                output::err(format!("Could not load file: {}", path.display()));
            }
            Err(LoadError::NotAnObject) => output::err("Configuration must be an object"),
        }
    }

    /// Run until `exit`, end of input, or Ctrl-C.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            let Some(line) = self.prompt().await? else {
                break;
            };
            let mut words = line.split_whitespace();
            let Some(command) = words.next() else {
                continue;
            };
            let args: Vec<&str> = words.collect();
            println!();

            match command {
                "exit" => break,
                "help" | "?" => self.cmd_help(),
                "config" => self.cmd_config(),
                "load" => self.cmd_load(&args),
                "connect" => self.cmd_connect(),
                "disconnect" => self.cmd_disconnect(),
                "cluster" => self.cmd_cluster().await,
                unknown => output::err(format!("Command not found: {unknown}")),
            }
        }
        Ok(())
    }

    async fn prompt(&self) -> io::Result<Option<String>> {
        println!();
        println!(" ┌──({})", self.session.broker);
        print!(" └─$ ");
        io::stdout().flush()?;

        tokio::select! {
            line = read_line() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                Ok(None)
            }
        }
    }

    fn cmd_help(&self) {
        println!("{}", output::help_table(COMMANDS));
    }

    fn cmd_config(&self) {
        if self.session.config.is_empty() {
            output::err("No configuration");
            return;
        }
        println!("{}", output::config_table(self.session.config.entries()));
    }

    fn cmd_load(&mut self, args: &[&str]) {
        let [path] = args else {
            output::err("usage: load <file>");
            return;
        };
        self.load(Path::new(*path));
    }

    fn cmd_connect(&mut self) {
        if self.session.config.is_empty() {
            output::err("Configuration required");
            return;
        }

        match connect::connect(&self.session.config) {
            Ok(outcome) => {
                let applied = self.session.apply(outcome);
                if let Some(group_id) = &applied.generated_group_id {
                    output::ok(format!("Group ID not configured, using: {group_id}"));
                    println!();
                }
                match &applied.admin_error {
                    None => output::ok("Admin client connected"),
                    Some(error) => output::err(format!("Admin client connection failed: {error}")),
                }
                println!();
                match &applied.consumer_error {
                    None => output::ok("Consumer connected"),
                    Some(error) => output::err(format!("Consumer connection failed: {error}")),
                }
            }
            Err(ConnectError::BootstrapMissing) => {
                output::err("Bootstrap server not configured");
            }
        }
    }

    fn cmd_disconnect(&mut self) {
        let disconnected = self.session.disconnect();
        if !disconnected.admin && !disconnected.consumer {
            output::err("Not connected");
            return;
        }
        if disconnected.admin {
            output::ok("Admin disconnected");
        }
        if disconnected.consumer {
            output::ok("Consumer disconnected");
        }
    }

    async fn cmd_cluster(&mut self) {
        let report = match cluster::describe_cluster(
            self.session.admin.as_ref(),
            self.session.consumer.as_ref(),
            self.policy,
        )
        .await
        {
            Ok(report) => report,
            Err(DiscoverError::NotConnected) => {
                output::err("Not connected");
                return;
            }
            Err(DiscoverError::Metadata(error)) => {
                output::err(format!("Could not query metadata: {error}"));
                return;
            }
        };

        output::ok(format!(
            "Cluster ID: {}",
            report.cluster_id.as_deref().unwrap_or("unknown")
        ));
        println!();
        output::ok(format!(
            "Metadata origin broker name: {}",
            report.origin_broker_name
        ));
        println!();
        println!("{}", output::broker_table(&report.brokers));
        println!();
        match report.origin_broker {
            IdClaim::Valid(id) => output::ok(format!("Metadata origin broker ID: {id}")),
            IdClaim::Invalid(id) => output::err(format!("Invalid metadata origin broker ID: {id}")),
            IdClaim::Unavailable => output::err("Metadata origin broker ID unavailable"),
        }
        println!();
        match report.controller {
            IdClaim::Valid(id) => output::ok(format!("Controller broker ID: {id}")),
            IdClaim::Invalid(id) => output::err(format!("Invalid controller broker ID: {id}")),
            IdClaim::Unavailable => output::err("Controller broker ID unavailable"),
        }

        for config in &report.broker_configs {
            println!();
            match &config.entries {
                Ok(entries) => {
                    output::ok(format!("Broker {} configuration:", config.broker_id));
                    println!();
                    println!("{}", output::config_entry_table(entries, &self.policy));
                }
                Err(_) => output::err(format!("Could not describe broker {}", config.broker_id)),
            }
        }
    }
}

/// Read one line from stdin without stalling the runtime.
async fn read_line() -> io::Result<Option<String>> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    })
    .await
    .map_err(io::Error::other)?
}
