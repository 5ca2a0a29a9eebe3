//! Splitting a monthly bill between family groups

use bill_split_core::utils::{select_latest_bill, MemoryConfigStore};
use bill_split_core::{
    BillConfigStore, BillSplitter, BreakdownFormat, GroupMapping, GroupMappingEntry,
    SplitConfig, TransferAdjustment,
};
use bigdecimal::BigDecimal;

fn bill_pages() -> Vec<Vec<&'static str>> {
    vec![
        vec![
            "Your bill",
            "Nancy Siegel",
            "$45.12",
            "iPhone 13",
            "(555) 010-0001",
            "David J Siegel",
            "$52.40",
            "iPhone 15 Pro",
            "555.010.0002",
            "Subtotal",
            "$97.52",
            "continued",
            "Page 1",
        ],
        vec![
            "Elana Siegel",
            "$38.00",
            "Galaxy S23",
            "555-010-0003",
            "Tova Niderberg Watch",
            "$10.00",
            "Apple Watch",
            "555-010-0004",
            "Account-wide charges & credits",
            "-$24.00",
            "Autopay discount",
            "Page 2",
        ],
    ]
}

fn default_config() -> SplitConfig {
    SplitConfig {
        mapping: GroupMapping::from_entries(vec![
            GroupMappingEntry::new("Savti", "1", "Nancy Siegel", "(555) 010-0001"),
            GroupMappingEntry::new("Papa", "2", "David J Siegel", "555.010.0002"),
            GroupMappingEntry::new("New Roc Siegels", "3", "Elana Siegel", "555-010-0003"),
            GroupMappingEntry::new(
                "Riverdale Siegels",
                "4",
                "Tova Niderberg Watch",
                "555-010-0004",
            )
            .with_device("Apple Watch"),
        ]),
        adjustments: vec![TransferAdjustment::new(BigDecimal::from(7), "3", "4")],
        policy: "evenly".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(true).with_level(true).init();

    let downloads = ["MyBill_01.15.2025.pdf", "MyBill_02.14.2025.pdf", "notes.txt"];
    if let Some(latest) = select_latest_bill(downloads) {
        println!("Splitting {}\n", latest);
    }

    let config = match std::env::args().nth(1) {
        Some(path) => SplitConfig::from_path(path)?,
        None => default_config(),
    }
    .apply_env_overrides();

    let mut store = MemoryConfigStore::new();
    store.save_group_mapping(&config.mapping).await?;
    for adjustment in &config.adjustments {
        store.add_transfer_adjustment(adjustment).await?;
    }
    store.save_reconciliation_policy(&config.policy()).await?;

    let splitter = BillSplitter::new(store);
    let summary = splitter.split(bill_pages()).await?;

    println!("Account-wide charges & credits: {}", summary.account_wide_value);
    println!(
        "Adjustments applied: {}, account-wide distributed: {}\n",
        summary.report.adjustments_applied, summary.report.account_wide_applied
    );

    let breakdown = summary.breakdown(BreakdownFormat::PlainText);
    print!("{}", breakdown.text);
    println!("Total: ${}", breakdown.total);

    Ok(())
}
