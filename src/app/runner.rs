use crate::config::{LocalStorage, Settings};
use crate::core::etl::EtlEngine;
use crate::core::Pipeline;
use crate::utils::error::{BatchError, Result};
use crate::utils::format;
use crate::utils::validation::Validate;
use std::path::Path;

pub fn validated(settings: Settings) -> Result<Settings> {
    settings.validate()?;
    tracing::debug!("Settings: {:?}", settings);
    Ok(settings)
}

/// Runs `pipeline` over `input` and returns the process exit code.
pub fn execute<P: Pipeline>(pipeline: P, settings: &Settings, input: &Path) -> i32 {
    if settings.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(&settings.output_dir);
    let engine = EtlEngine::new_with_monitoring(pipeline, storage, settings.monitor);

    match engine.run(input) {
        Ok(summary) => {
            tracing::info!(
                "✅ {} test case(s) done in {}s",
                summary.test_cases,
                format::seconds(summary.elapsed)
            );
            println!("Results saved to: {}", summary.output_path.display());
            0
        }
        Err(e) => report_failure(&e),
    }
}

pub fn report_failure(e: &BatchError) -> i32 {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("ERROR: {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    e.exit_code()
}
