use std::path::Path;

use scatterboost_core::{CalibrationError, CalibrationResult, ReelSetFile, estimate};

pub fn run(dataset_path: &str, hit_symbol: &str) -> CalibrationResult<()> {
    let reels = ReelSetFile::load_from_path(Path::new(dataset_path))?;

    println!(
        "{:<20} {:>6} {:>10} {:>10} {:>10}",
        "Category", "Reels", "Elements", "Scatters", "p_single"
    );
    println!("{}", "-".repeat(60));
    for category in reels.categories() {
        let dataset = reels.dataset(category)?;
        match estimate(&dataset, hit_symbol) {
            Ok(est) => println!(
                "{:<20} {:>6} {:>10} {:>10} {:>10.4}",
                category,
                dataset.len(),
                est.total_elements,
                est.total_hits,
                est.p_single
            ),
            Err(CalibrationError::EmptyDataset { .. }) => println!(
                "{:<20} {:>6} {:>10} {:>10} {:>10}",
                category,
                dataset.len(),
                0,
                0,
                "-"
            ),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
