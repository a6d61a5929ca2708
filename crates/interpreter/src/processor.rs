//! Executes command scripts against a [`StoreService`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use domain::StoreResult;
use engine::StoreService;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::Command;
use crate::error::{CommandError, ExecutionError, ScriptError, SyntaxError};
use crate::tokenizer::{is_blank_or_comment, tokenize};

/// Pseudo-command recorded when the line source itself fails.
pub const READ_FAILURE: &str = "<read>";

/// Keyword recorded for a line with no usable first word.
pub const MALFORMED: &str = "malformed";

/// Result of one executed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Snapshot of the entity the command returned.
    Success(Value),
    Failure(CommandError),
}

/// One executed line of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub line_number: usize,
    /// Command keyword, e.g. `define-store`.
    pub command: String,
    /// The trimmed line as written in the script.
    pub line: String,
    pub outcome: Outcome,
}

impl CommandRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }
}

/// Every executed line of a script, plus the failures on their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptReport {
    pub records: Vec<CommandRecord>,
    pub errors: Vec<CommandError>,
}

impl ScriptReport {
    fn push(&mut self, record: CommandRecord) {
        if let Outcome::Failure(err) = &record.outcome {
            self.errors.push(err.clone());
        }
        self.records.push(record);
    }

    /// Number of lines that executed successfully.
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Reads command lines and applies them to one store service.
///
/// A failing line is recorded and processing moves on to the next one.
/// Nothing that already succeeded is rolled back.
pub struct CommandProcessor {
    service: StoreService,
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandProcessor {
    /// Creates a processor over a fresh, empty service.
    pub fn new() -> Self {
        Self::with_service(StoreService::new())
    }

    pub fn with_service(service: StoreService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &StoreService {
        &self.service
    }

    /// Runs every line of `script`.
    pub fn process_str(&self, script: &str) -> ScriptReport {
        self.process_reader(script.as_bytes())
    }

    /// Opens `path` and runs every line in it.
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<ScriptReport, ScriptError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.process_reader(BufReader::new(file)))
    }

    /// Runs lines from `reader` until it is exhausted or fails.
    ///
    /// A line that is not valid UTF-8 is recorded as malformed and skipped.
    /// Only a failure of the reader itself stops processing.
    pub fn process_reader(&self, mut reader: impl BufRead) -> ScriptReport {
        let mut report = ScriptReport::default();
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    line_number += 1;
                    tracing::error!(line_number, error = %err, "failed to read script line");
                    metrics::counter!("interpreter_command_errors_total", "kind" => "read")
                        .increment(1);
                    report.push(CommandRecord {
                        line_number,
                        command: READ_FAILURE.to_string(),
                        line: String::new(),
                        outcome: Outcome::Failure(CommandError {
                            command: READ_FAILURE.to_string(),
                            reason: err.to_string(),
                            line_number,
                            kind: None,
                            line: String::new(),
                        }),
                    });
                    break;
                }
            }
            line_number += 1;

            let bytes = strip_line_ending(&buf);
            let record = match std::str::from_utf8(bytes) {
                Ok(line) => self.execute_line(line_number, line),
                Err(_) => {
                    let lossy = String::from_utf8_lossy(bytes);
                    (!is_blank_or_comment(&lossy)).then(|| {
                        metrics::counter!("interpreter_commands_total", "command" => MALFORMED)
                            .increment(1);
                        self.reject(
                            line_number,
                            MALFORMED,
                            lossy.trim().to_string(),
                            ExecutionError::from(SyntaxError::InvalidUtf8),
                        )
                    })
                }
            };
            if let Some(record) = record {
                report.push(record);
            }
        }

        tracing::info!(
            commands = report.records.len(),
            errors = report.errors.len(),
            "script processed"
        );
        report
    }

    /// Executes one line. Blank and comment lines yield `None`.
    pub fn execute_line(&self, line_number: usize, line: &str) -> Option<CommandRecord> {
        if is_blank_or_comment(line) {
            return None;
        }
        let text = line.trim().to_string();

        let parsed = tokenize(&text).and_then(|tokens| Command::parse(&tokens));
        let command = match &parsed {
            Ok(command) => command.keyword(),
            Err(_) => MALFORMED,
        };
        metrics::counter!("interpreter_commands_total", "command" => command).increment(1);

        match parsed
            .map_err(ExecutionError::from)
            .and_then(|parsed| self.apply(&parsed))
        {
            Ok(snapshot) => {
                tracing::debug!(line_number, command, "command applied");
                Some(CommandRecord {
                    line_number,
                    command: command.to_string(),
                    line: text,
                    outcome: Outcome::Success(snapshot),
                })
            }
            Err(err) => {
                let keyword = match &err {
                    ExecutionError::Syntax(_) => written_keyword(&text),
                    _ => command.to_string(),
                };
                Some(self.reject(line_number, keyword, text, err))
            }
        }
    }

    /// Logs and counts a failed line and builds its record.
    fn reject(
        &self,
        line_number: usize,
        command: impl Into<String>,
        line: String,
        err: ExecutionError,
    ) -> CommandRecord {
        let command = command.into();
        match &err {
            ExecutionError::Store(store_err) => tracing::warn!(
                line_number,
                command = %command,
                kind = %store_err.kind,
                action = %store_err.action,
                reason = %store_err.reason,
                "command failed"
            ),
            other => tracing::warn!(
                line_number,
                command = %command,
                line = %line,
                reason = %other,
                "malformed command"
            ),
        }
        metrics::counter!("interpreter_command_errors_total", "kind" => err.label()).increment(1);

        let error = CommandError::new(line_number, command.clone(), line.clone(), &err);
        CommandRecord {
            line_number,
            command,
            line,
            outcome: Outcome::Failure(error),
        }
    }

    fn apply(&self, command: &Command) -> Result<Value, ExecutionError> {
        let s = &self.service;
        match command {
            Command::DefineStore { store, name, address } => {
                snapshot(s.provision_store(store, name, address))
            }
            Command::ShowStore { store } => snapshot(s.show_store(store)),
            Command::ListStores => snapshot(Ok(s.list_stores())),
            Command::UpdateStore { store, description, address } => {
                snapshot(s.update_store(store, description, address))
            }
            Command::DeleteStore { store } => snapshot(s.delete_store(store)),

            Command::DefineAisle { store, aisle, name, description, location } => {
                snapshot(s.provision_aisle(store, aisle, name, description, *location))
            }
            Command::ShowAisle { store, aisle } => snapshot(s.show_aisle(store, aisle)),
            Command::UpdateAisle { store, aisle, name, description, location } => {
                snapshot(s.update_aisle(store, aisle, name, description, *location))
            }
            Command::DeleteAisle { store, aisle } => snapshot(s.delete_aisle(store, aisle)),

            Command::DefineShelf { store, aisle, shelf, name, level, description, temperature } => {
                snapshot(s.provision_shelf(
                    store,
                    aisle,
                    shelf,
                    name,
                    *level,
                    description,
                    *temperature,
                ))
            }
            Command::ShowShelf { store, aisle, shelf } => snapshot(s.show_shelf(store, aisle, shelf)),
            Command::UpdateShelf { store, aisle, shelf, name, description } => {
                snapshot(s.update_shelf(store, aisle, shelf, name, description))
            }
            Command::DeleteShelf { store, aisle, shelf } => {
                snapshot(s.delete_shelf(store, aisle, shelf))
            }

            Command::DefineProduct { product, name, description, size, category, price, temperature } => {
                snapshot(s.provision_product(
                    product,
                    name,
                    description,
                    size,
                    category,
                    *price,
                    *temperature,
                ))
            }
            Command::ShowProduct { product } => snapshot(s.show_product(product)),
            Command::UpdateProduct { product, name, description, size, category, price } => {
                snapshot(s.update_product(product, name, description, size, category, *price))
            }
            Command::DeleteProduct { product } => snapshot(s.delete_product(product)),

            Command::DefineInventory {
                inventory,
                store,
                aisle,
                shelf,
                capacity,
                count,
                product,
                inventory_type,
            } => snapshot(s.provision_inventory(
                inventory,
                store,
                aisle,
                shelf,
                *capacity,
                *count,
                product,
                *inventory_type,
            )),
            Command::ShowInventory { inventory } => snapshot(s.show_inventory(inventory)),
            Command::UpdateInventory { inventory, delta } => {
                snapshot(s.update_inventory(inventory, *delta))
            }
            Command::DeleteInventory { inventory } => snapshot(s.delete_inventory(inventory)),

            Command::DefineCustomer {
                customer,
                first_name,
                last_name,
                customer_type,
                email,
                address,
                age_group,
            } => snapshot(s.provision_customer(
                customer,
                first_name,
                last_name,
                *customer_type,
                email,
                address,
                *age_group,
            )),
            Command::ShowCustomer { customer } => snapshot(s.show_customer(customer)),
            Command::UpdateCustomer { customer, store, aisle } => {
                snapshot(s.update_customer(customer, store, aisle))
            }
            Command::DeleteCustomer { customer } => snapshot(s.delete_customer(customer)),

            Command::DefineBasket { basket } => snapshot(s.provision_basket(basket)),
            Command::ShowBasket { basket } => snapshot(s.show_basket(basket)),
            Command::AssignBasket { customer, basket } => {
                snapshot(s.assign_customer_basket(customer, basket))
            }
            Command::GetCustomerBasket { customer } => snapshot(s.get_customer_basket(customer)),
            Command::AddBasketItem { basket, product, quantity } => {
                snapshot(s.add_product_to_basket(basket, product, *quantity))
            }
            Command::RemoveBasketItem { basket, product, quantity } => {
                snapshot(s.remove_product_from_basket(basket, product, *quantity))
            }
            Command::ClearBasket { basket } => snapshot(s.clear_basket(basket)),
            Command::DeleteBasket { basket } => snapshot(s.delete_basket(basket)),

            Command::DefineDevice { device, name, kind, store, aisle } => {
                snapshot(s.provision_device(device, name, *kind, store, aisle))
            }
            Command::ShowDevice { device } => snapshot(s.show_device(device)),
            Command::UpdateDevice { device, name } => snapshot(s.update_device(device, name)),
            Command::DeleteDevice { device } => snapshot(s.delete_device(device)),
            Command::RaiseEvent { device, text } => snapshot(s.raise_event(device, text)),
            Command::IssueCommand { device, text } => snapshot(s.issue_command(device, text)),
        }
    }
}

fn snapshot<T: Serialize>(result: StoreResult<T>) -> Result<Value, ExecutionError> {
    Ok(serde_json::to_value(result?)?)
}

/// Drops a trailing `\n` or `\r\n`.
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Lowercased first word of a line that did not parse.
fn written_keyword(line: &str) -> String {
    line.split_whitespace()
        .next()
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| MALFORMED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ErrorKind;
    use std::io::{self, Read};

    /// Yields its data, then fails every later read.
    struct FailingReader {
        data: io::Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                return Err(io::Error::other("disk went away"));
            }
            Ok(n)
        }
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        let processor = CommandProcessor::new();
        let report = processor.process_str("# setup\n\n   \ndefine-store S1 Corner \"1 Main St\"\n");
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].line_number, 4);
        assert!(report.is_clean());
    }

    #[test]
    fn test_success_records_snapshot() {
        let processor = CommandProcessor::new();
        let record = processor
            .execute_line(1, r#"define-store S1 Corner "1 Main St""#)
            .unwrap();
        let Outcome::Success(value) = record.outcome else {
            panic!("expected success");
        };
        assert_eq!(value["id"], "S1");
        assert_eq!(value["address"], "1 Main St");
    }

    #[test]
    fn test_engine_failure_is_recorded_and_processing_continues() {
        let processor = CommandProcessor::new();
        let report = processor.process_str("show-store S9\ndefine-store S9 Late Nowhere\n");

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].line_number, 1);
        assert_eq!(report.errors[0].kind, Some(ErrorKind::NotFound));
        assert!(report.records[1].is_success());
        assert!(processor.service().show_store("S9").is_ok());
    }

    #[test]
    fn test_malformed_line_reports_reason() {
        let processor = CommandProcessor::new();
        let report = processor.process_str("define-store S1\n");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].command, "define-store");
        assert_eq!(report.errors[0].line, "define-store S1");
        assert_eq!(
            report.errors[0].reason,
            "define-store expects 3 argument(s), found 1"
        );
        assert_eq!(report.errors[0].kind, None);
    }

    #[test]
    fn test_records_carry_keyword_and_line() {
        let processor = CommandProcessor::new();
        let report = processor.process_str(
            "  define-store S1 Corner Main  \nshow-store S9\nFly away\n\"unterminated\n",
        );

        let commands: Vec<_> = report.records.iter().map(|r| r.command.as_str()).collect();
        assert_eq!(commands, ["define-store", "show-store", "fly", "\"unterminated"]);
        assert_eq!(report.records[0].line, "define-store S1 Corner Main");
        assert_eq!(report.errors[0].command, "show-store");
        assert_eq!(report.errors[0].line, "show-store S9");
        assert_eq!(report.errors[1].reason, "unknown command 'fly'");
        assert_eq!(report.errors[2].reason, "unterminated quote");
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let processor = CommandProcessor::new();
        let script: &[u8] =
            b"define-store S1 A B\r\ndefine-store S2 \xff\xfe B\r\n# caf\xe9\ndefine-store S3 C D\n";

        let report = processor.process_reader(script);

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.errors.len(), 1);
        let error = &report.errors[0];
        assert_eq!(error.line_number, 2);
        assert_eq!(error.command, MALFORMED);
        assert_eq!(error.reason, "invalid UTF-8");
        assert_eq!(error.kind, None);
        assert_eq!(report.records[2].line_number, 4);
        assert!(processor.service().show_store("S3").is_ok());
    }

    #[test]
    fn test_read_failure_stops_processing() {
        let processor = CommandProcessor::new();
        let reader = io::BufReader::new(FailingReader {
            data: io::Cursor::new(b"define-store S1 Corner Main\n".to_vec()),
        });

        let report = processor.process_reader(reader);

        assert_eq!(report.records.len(), 2);
        assert!(report.records[0].is_success());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].command, READ_FAILURE);
        assert_eq!(report.errors[0].line_number, 2);
        // applied work is kept
        assert!(processor.service().show_store("S1").is_ok());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let processor = CommandProcessor::new();
        let report = processor.process_str("define-basket B1\nshow-basket B2\n");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["records"][0]["outcome"]["success"]["id"], "B1");
        assert_eq!(json["errors"][0]["kind"], "not_found");
        assert_eq!(json["errors"][0]["line_number"], 2);
    }
}
