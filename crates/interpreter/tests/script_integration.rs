//! Integration tests for script processing.
//!
//! These tests run whole scripts through `CommandProcessor` and check both
//! the report and the resulting engine state.

use std::io::Write;

use domain::ErrorKind;
use interpreter::{CommandProcessor, Outcome, ScriptError};

const SAMPLE_SCRIPT: &str = include_str!("../../../scripts/store.script");

/// Ten command lines; line 6 names a temperature that does not exist.
const ONE_MALFORMED: &str = "\
define-store S1 Downtown \"100 Main St\"
define-aisle S1 A1 Pantry \"Dry goods\" floor
define-shelf S1 A1 SH1 Top high Grains ambient
define-product P1 Rice \"Long grain\" \"1 kg\" grains 2.49 ambient
define-inventory I1 S1 A1 SH1 50 20 P1 standard
define-product P2 Soup Tomato \"400 g\" canned 1.99 lukewarm
define-customer C1 Ada Lovelace registered ada@example.com Home
define-basket B1
update-customer C1 S1 A1
assign-basket C1 B1
";

mod scripts {
    use super::*;

    #[test]
    fn sample_script_runs_clean() {
        let processor = CommandProcessor::new();
        let report = processor.process_str(SAMPLE_SCRIPT);

        assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);
        assert_eq!(report.records.len(), 31);

        let service = processor.service();
        assert_eq!(service.show_inventory("I1").unwrap().count(), 25);
        assert_eq!(service.show_inventory("I2").unwrap().count(), 6);
        assert!(service.show_basket("B1").unwrap().is_empty());
        assert_eq!(service.show_device("CAM1").unwrap().events().len(), 1);
        assert_eq!(service.show_device("BOT1").unwrap().commands().len(), 1);
    }

    #[test]
    fn one_malformed_line_among_ten() {
        let processor = CommandProcessor::new();
        let report = processor.process_str(ONE_MALFORMED);

        assert_eq!(report.records.len(), 10);
        assert_eq!(report.succeeded(), 9);
        assert_eq!(report.errors.len(), 1);

        let error = &report.errors[0];
        assert_eq!(error.line_number, 6);
        assert_eq!(error.reason, "invalid temperature: 'lukewarm'");
        assert_eq!(error.kind, None);

        // lines after the failure still ran
        let basket = processor.service().get_customer_basket("C1").unwrap();
        assert_eq!(basket.id().as_str(), "B1");
        assert!(processor.service().show_product("P2").is_err());
    }

    #[test]
    fn engine_rejections_carry_their_kind() {
        let processor = CommandProcessor::new();
        let script = format!(
            "{ONE_MALFORMED}\
define-customer G1 Guest User guest g@example.com Nowhere
define-basket B2
update-customer G1 S1 A1
assign-basket G1 B2
add-basket-item B2 P1 5
add-basket-item B1 P1 500
remove-basket-item B1 P1 1
"
        );

        let report = processor.process_str(&script);

        let kinds: Vec<_> = report.errors.iter().map(|e| (e.line_number, e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (6, None),
                (15, Some(ErrorKind::GuestNotAllowed)),
                (16, Some(ErrorKind::InsufficientInventory)),
                (17, Some(ErrorKind::RemoveExceedsHeld)),
            ]
        );
        assert_eq!(processor.service().show_inventory("I1").unwrap().count(), 20);
    }

    #[test]
    fn failures_do_not_roll_back_earlier_lines() {
        let processor = CommandProcessor::new();
        let report = processor.process_str(
            "define-store S1 Downtown Main\n\
             define-store S1 Again Main\n\
             show-store S1\n",
        );

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, Some(ErrorKind::DuplicateEntity));
        let Outcome::Success(store) = &report.records[2].outcome else {
            panic!("show-store should succeed");
        };
        assert_eq!(store["name"], "Downtown");
    }
}

mod files {
    use super::*;

    #[test]
    fn process_file_reads_script_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ONE_MALFORMED.as_bytes()).unwrap();
        file.flush().unwrap();

        let processor = CommandProcessor::new();
        let report = processor.process_file(file.path()).unwrap();

        assert_eq!(report.succeeded(), 9);
        assert_eq!(report.errors[0].line_number, 6);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.script");

        let processor = CommandProcessor::new();
        let err = processor.process_file(&path).unwrap_err();

        let ScriptError::Io { path: reported, source } = err;
        assert_eq!(reported, path);
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        assert!(processor.service().list_stores().is_empty());
    }
}
