//! Previewing which lines of a new bill are already known

use bill_split_core::utils::MemoryConfigStore;
use bill_split_core::{BillConfigStore, BillSplitter, KnownLine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let mut store = MemoryConfigStore::new();
    store
        .save_known_line(&KnownLine {
            id: "55".to_string(),
            name: "Emmy".to_string(),
            number: "555-300-0001".to_string(),
            device: "iPhone 12".to_string(),
        })
        .await?;

    let pages = vec![vec![
        "Emmy",
        "$40.00",
        "iPhone 15",
        "555-300-0001",
        "Caleb Siegel",
        "$35.50",
        "Pixel 8",
        "555-300-0002",
        "Page 1",
        "end",
    ]];

    let mut splitter = BillSplitter::new(store);
    let preview = splitter.preview(pages.clone()).await?;

    for line in &preview.lines {
        let status = if line.exists { "known" } else { "new" };
        println!(
            "{:<6} {} | {} | {} | ${}",
            status, line.name, line.device, line.number, line.charge
        );
    }
    println!(
        "\n{} known, {} new, total ${}",
        preview.existing_lines_count, preview.new_lines_count, preview.total_charge
    );

    let saved = splitter
        .save_new_lines(&preview, |line| format!("{}-{}", line.name, line.number))
        .await?;
    println!("Saved {} new line(s)", saved.len());

    Ok(())
}
