use std::path::{Path, PathBuf};

use scatterboost_core::{
    CalibrationError, CalibrationReport, CalibrationResult, ReelSetFile, calibrate,
};

use super::ConfigOverrides;

pub struct CalibrateCommandConfig<'a> {
    pub dataset_path: &'a str,
    pub category: &'a str,
    pub overrides: ConfigOverrides<'a>,
    pub output_path: Option<&'a str>,
}

pub fn run(cfg: CalibrateCommandConfig<'_>) -> CalibrationResult<()> {
    let config = super::build_config(&cfg.overrides)?;
    let reels = ReelSetFile::load_from_path(Path::new(cfg.dataset_path))?;
    let dataset = reels.dataset(cfg.category)?;

    println!(
        "🎰 Calibrating '{}' ({} reel(s), {}x{} grid, trigger at {}+ '{}')\n",
        dataset.category,
        dataset.len(),
        config.rows,
        config.cols,
        config.threshold,
        config.hit_symbol
    );

    let report = calibrate(&dataset, &config)?;
    print!("{}", render_report(&report));

    if let Some(path) = cfg.output_path {
        write_report(&report, path)?;
        println!("\n📄 Report saved to: {path}");
    }
    Ok(())
}

/// Write the full report as pretty JSON.
pub fn write_report(report: &CalibrationReport, path: &str) -> CalibrationResult<()> {
    let json = serde_json::to_string_pretty(report).map_err(|source| CalibrationError::Json {
        origin: path.to_string(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| CalibrationError::Io {
        path: PathBuf::from(path),
        source,
    })
}

/// Human-readable summary of a calibration pass.
pub fn render_report(report: &CalibrationReport) -> String {
    let k = report.config.threshold;
    let mut out = String::new();

    out.push_str(&format!(
        "  Elements: {}   Scatters: {}   p_single: {:.4}\n\n",
        report.estimate.total_elements, report.estimate.total_hits, report.estimate.p_single
    ));
    out.push_str(&format!(
        "  Current P(>= {k}):        {:.4}\n",
        report.current_prob
    ));
    out.push_str(&format!(
        "  Target P(>= {k}) ({}x):   {:.4}\n",
        report.config.target_multiplier, report.target_prob
    ));
    out.push_str(&format!(
        "  Required p_single:      {:.4}{}\n",
        report.solution.p,
        if report.solution.saturated {
            "  (saturated at certainty)"
        } else {
            ""
        }
    ));
    out.push_str(&format!(
        "  Scatters to add:        {} (approx.)\n",
        report.total_needed_ceil()
    ));

    out.push_str(&format!("\n{}\n", "=".repeat(48)));
    out.push_str(&format!(
        "{:<8} {:>8} {:>10} {:>10}\n",
        "Reel", "Length", "Scatters", "Add"
    ));
    out.push_str(&format!("{}\n", "-".repeat(48)));
    for alloc in &report.allocations {
        out.push_str(&format!(
            "  {:<6} {:>8} {:>10} {:>10}\n",
            alloc.index, alloc.length, alloc.existing_hits, alloc.additional_hits
        ));
    }
    out.push_str(&format!("{}\n", "-".repeat(48)));
    out.push_str(&format!(
        "  {:<6} {:>8} {:>10} {:>10}\n",
        "total", report.estimate.total_elements, report.estimate.total_hits, report.total_added
    ));

    out.push_str(&format!(
        "\n  New p_single: {:.4}   New P(>= {k}): {:.4}\n",
        report.new_p_single, report.achieved_prob
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scatterboost_core::{CalibrationConfig, Dataset, Sequence};

    #[test]
    fn test_render_report_lists_every_reel() {
        let dataset = Dataset::new(
            "default",
            vec![
                Sequence::from_packed("1100000000"),
                Sequence::from_packed("11100000000000000000"),
            ],
        );
        let report = calibrate(&dataset, &CalibrationConfig::default()).unwrap();
        let text = render_report(&report);
        assert!(text.contains("p_single: 0.1667"));
        assert!(text.contains("Current P(>= 3):        0.8113"));
        assert!(text.contains("saturated at certainty"));
        assert_eq!(text.matches("\n  0 ").count() + text.matches("\n  1 ").count(), 2);
        assert!(text.contains("New p_single: 0.5455"));
    }

    fn small_report() -> CalibrationReport {
        let dataset = Dataset::new("default", vec![Sequence::from_packed("1100000000")]);
        calibrate(&dataset, &CalibrationConfig::default()).unwrap()
    }

    #[test]
    fn test_write_report_saves_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let path = path.to_str().unwrap();
        write_report(&small_report(), path).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["category"], "default");
    }

    #[test]
    fn test_write_report_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let err = write_report(&small_report(), path.to_str().unwrap()).unwrap_err();
        match err {
            CalibrationError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
