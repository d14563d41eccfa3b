//! Generate Command
//!
//! One-shot pipeline run without the HTTP server.
//!
//! Usage:
//!   bizgen generate leap-of-faith --input inputs.json
//!   echo '{"idea": "..."}' | bizgen generate mom-test --input -

use std::io::Read;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ai::{Generator, TimeoutConfig, with_timeout};
use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::{BizError, Generated, ImageInputs, LeapOfFaithInputs, MomTestInputs, Result};

/// Which endpoint to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenerateKind {
    LeapOfFaith,
    MomTest,
    Image,
}

pub async fn run(kind: GenerateKind, input: &Path, compact: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let generator = Generator::from_config(&config)?;
    let timeouts = TimeoutConfig::from_config(&config);

    // Worst case: every provider in the chain times out in turn
    let text_budget = timeouts.llm_request * (config.llm.providers.len() as u32 + 1);

    let json = match kind {
        GenerateKind::LeapOfFaith => {
            let inputs: LeapOfFaithInputs = read_input(input)?;
            let result =
                with_timeout(text_budget, generator.leap_of_faith(&inputs), "leap of faith").await?;
            render(&result, compact)?
        }
        GenerateKind::MomTest => {
            let inputs: MomTestInputs = read_input(input)?;
            let result = with_timeout(
                text_budget,
                async { Ok::<_, BizError>(generator.mom_test(&inputs).await) },
                "mom test",
            )
            .await?;
            render(&result, compact)?
        }
        GenerateKind::Image => {
            let inputs: ImageInputs = read_input(input)?;
            let result = with_timeout(
                timeouts.image_batch(),
                async { Ok::<_, BizError>(generator.business_image(&inputs).await) },
                "business image",
            )
            .await?;
            render(&result, compact)?
        }
    };

    println!("{}", json);
    Ok(())
}

/// Read JSON inputs from a file, or stdin when `path` is `-`
pub fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            BizError::Config(format!("Cannot read input {}: {}", path.display(), e))
        })?
    };

    let raw = if raw.trim().is_empty() { "{}" } else { raw.as_str() };
    Ok(serde_json::from_str(raw)?)
}

fn render<T: Serialize>(result: &Generated<T>, compact: bool) -> Result<String> {
    if let Some(warning) = &result.warning {
        let output = Output::new();
        output.warning(warning);
        for entry in result.errors.iter().flatten() {
            output.error(entry);
        }
    }

    Ok(if compact {
        serde_json::to_string(result)?
    } else {
        serde_json::to_string_pretty(result)?
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Assumptions, CircleType};
    use tempfile::TempDir;

    #[test]
    fn test_read_input_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inputs.json");
        std::fs::write(
            &path,
            r#"{"customer": "bakers", "circleType": "hypothesis", "leapOfFaithResults": ["x"]}"#,
        )
        .unwrap();

        let inputs: LeapOfFaithInputs = read_input(&path).unwrap();
        assert_eq!(inputs.customer, "bakers");
        assert_eq!(inputs.circle_type, CircleType::Hypothesis);
    }

    #[test]
    fn test_read_input_empty_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");
        std::fs::write(&path, "\n").unwrap();

        let inputs: MomTestInputs = read_input(&path).unwrap();
        assert_eq!(inputs, MomTestInputs::default());
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input::<ImageInputs>(Path::new("/nonexistent/inputs.json")).unwrap_err();
        assert!(err.to_string().contains("Cannot read input"));
    }

    #[test]
    fn test_render_compact() {
        let result = Generated::live(Assumptions {
            assumptions: vec!["a".into()],
        });
        assert_eq!(render(&result, true).unwrap(), r#"{"assumptions":["a"]}"#);
    }
}
