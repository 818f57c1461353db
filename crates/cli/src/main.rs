use anemia_core::{
    action_required_policy_from_env_value, constants::ACTION_REQUIRED_POLICY_ENV,
    derive_transferrin_saturation, regulatory_advisory, validation::lab_value, walk_pathway,
    CoreConfig, PathwayStep, PatientRecord, Stage, StageSequencer,
};
use anemia_wire::{RecordDocument, Report, WireResult};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "anemia")]
#[command(about = "KDIGO CKD anemia pathway CLI")]
struct Cli {
    /// How an action-required result gates advancing: advisory or blocking
    /// (defaults to $ANEMIA_ACTION_REQUIRED_POLICY, then advisory)
    #[arg(long, global = true)]
    policy: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pathway stages
    Stages,
    /// Evaluate one stage of a record document
    Evaluate {
        /// Record document (.yaml, .yml or .json)
        file: PathBuf,
        /// Stage number (1-4) or name
        #[arg(long, default_value = "1")]
        stage: Stage,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Walk a record document through the pathway as far as the gate allows
    Pathway {
        /// Record document (.yaml, .yml or .json)
        file: PathBuf,
    },
    /// Compute transferrin saturation from serum iron and TIBC
    Tsat {
        /// Serum iron (ug/dL)
        #[arg(long)]
        serum_iron: f64,
        /// Total iron binding capacity (ug/dL)
        #[arg(long)]
        tibc: f64,
    },
}

fn resolve_config(policy: Option<String>) -> Result<CoreConfig, Box<dyn std::error::Error>> {
    let value = policy.or_else(|| std::env::var(ACTION_REQUIRED_POLICY_ENV).ok());
    let policy = action_required_policy_from_env_value(value)?;
    Ok(CoreConfig::new(policy))
}

/// A rendered stage result plus the gate state, kept apart so stdout stays a single document.
struct StageEvaluation {
    rendered: WireResult<String>,
    can_advance: bool,
}

fn evaluate_stage_document(
    cfg: CoreConfig,
    record: PatientRecord,
    stage: Stage,
    format: OutputFormat,
) -> StageEvaluation {
    let mut sequencer = StageSequencer::with_record(cfg, record);
    sequencer.go_to(stage);
    let result = sequencer.result().clone();
    let advisory = regulatory_advisory(&result, sequencer.record().group());
    let step = PathwayStep {
        stage,
        result,
        advisory,
    };
    let rendered = match format {
        OutputFormat::Json => Report::step_json(&step),
        OutputFormat::Yaml => Report::step_yaml(&step),
    };
    StageEvaluation {
        rendered,
        can_advance: sequencer.can_advance(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = resolve_config(cli.policy)?;

    match cli.command {
        Some(Commands::Stages) => {
            for stage in Stage::ALL {
                println!("{stage}");
            }
        }
        Some(Commands::Evaluate {
            file,
            stage,
            format,
        }) => match RecordDocument::read_path(&file) {
            Ok(record) => {
                let evaluation = evaluate_stage_document(cfg, record, stage, format);
                match evaluation.rendered {
                    Ok(text) => println!("{text}"),
                    Err(e) => eprintln!("Error rendering result: {}", e),
                }
                eprintln!(
                    "Can advance: {} (action-required policy: {})",
                    if evaluation.can_advance { "yes" } else { "no" },
                    cfg.action_required_policy()
                );
            }
            Err(e) => eprintln!("Error reading {}: {}", file.display(), e),
        },
        Some(Commands::Pathway { file }) => match RecordDocument::read_path(&file) {
            Ok(record) => {
                let mut sequencer = StageSequencer::with_record(cfg, record);
                let outcome = walk_pathway(&mut sequencer);
                match Report::outcome_json(&outcome) {
                    Ok(text) => println!("{text}"),
                    Err(e) => eprintln!("Error rendering pathway: {}", e),
                }
            }
            Err(e) => eprintln!("Error reading {}: {}", file.display(), e),
        },
        Some(Commands::Tsat { serum_iron, tibc }) => {
            let serum_iron = lab_value("serum_iron", serum_iron)?;
            let tibc = lab_value("total_iron_binding_capacity", tibc)?;
            match derive_transferrin_saturation(Some(serum_iron), Some(tibc)) {
                Some(tsat) => println!("TSAT: {tsat}%"),
                None => println!("TSAT cannot be derived when TIBC is zero."),
            }
        }
        None => {
            println!("Use 'anemia --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anemia_core::{ActionRequiredPolicy, Group, LabValue, Sex};

    fn anemic_record() -> PatientRecord {
        PatientRecord::new()
            .with_group(Some(Group::Pd))
            .with_sex(Some(Sex::Male))
            .with_hemoglobin(Some(LabValue::new(10.4).expect("valid")))
    }

    #[test]
    fn json_output_is_a_single_document() {
        let evaluation = evaluate_stage_document(
            CoreConfig::default(),
            anemic_record(),
            Stage::Screening,
            OutputFormat::Json,
        );
        let text = evaluation.rendered.expect("render json");
        let value: serde_json::Value = serde_json::from_str(&text).expect("whole output is json");
        assert_eq!(value["stage"], "screening");
        assert_eq!(value["result"]["status"], "continue");
        assert!(evaluation.can_advance);
    }

    #[test]
    fn yaml_output_is_a_single_document() {
        let evaluation = evaluate_stage_document(
            CoreConfig::default(),
            anemic_record(),
            Stage::IronTherapy,
            OutputFormat::Yaml,
        );
        let text = evaluation.rendered.expect("render yaml");
        assert!(!text.contains("Can advance"));
        let value: serde_yaml::Value = serde_yaml::from_str(&text).expect("whole output is yaml");
        assert_eq!(value["stage"].as_str(), Some("iron_therapy"));
        assert!(!evaluation.can_advance);
    }

    #[test]
    fn policy_flag_wins_over_default() {
        let cfg = resolve_config(Some("blocking".into())).expect("valid policy");
        assert_eq!(cfg.action_required_policy(), ActionRequiredPolicy::Blocking);
        assert!(resolve_config(Some("sometimes".into())).is_err());
    }
}
