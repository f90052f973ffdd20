//! Invoice calculation walkthrough

use billing_core::{
    BillingEngine, ComponentRounding, DiscountSpec, EngineConfig, GstMode, GstSlab,
    InvoiceDraft, LineItemInput, LineItemResult, TaxProfile, TaxProfileCatalog,
};
use bigdecimal::BigDecimal;
use std::str::FromStr;

fn print_line(index: usize, line: &LineItemResult) {
    println!(
        "    {}. gross ₹{} - discount ₹{} = taxable ₹{}, tax ₹{} -> total ₹{}",
        index + 1,
        line.gross_amount,
        line.discount_amount,
        line.taxable_amount,
        line.tax_amount,
        line.total
    );
    for component in &line.component_amounts {
        println!("         {}: ₹{}", component.name, component.amount);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Billing Core - Invoice Walkthrough\n");

    // 1. Standard slabs
    println!("📊 Standard GST slabs:");
    for slab in GstSlab::ALL.iter() {
        println!("  {:?}: {}% ({})", slab, slab.rate(), slab.profile_id());
    }
    println!();

    // 2. Catalog with an extra inter-state profile
    let mut catalog = TaxProfileCatalog::standard_slabs();
    catalog.insert(TaxProfile::inter_state(
        "IGST12",
        "IGST 12%",
        BigDecimal::from(12),
    ))?;
    let engine = BillingEngine::new(catalog.clone());

    let medicine = || {
        LineItemInput::new(10, BigDecimal::from(100), BigDecimal::from(10))
            .with_tax_profile("GST12")
    };

    // 3. Same line under every regime
    for mode in [GstMode::Exclusive, GstMode::Inclusive, GstMode::NonGst] {
        println!("🏷️  {:?} pricing:", mode);
        let line = engine.calculate_line(&medicine(), mode)?;
        print_line(0, &line);
        println!();
    }

    // 4. Purchase entry with an overall discount
    println!("📦 Purchase entry (exclusive, 10% overall discount):");
    let mut draft = InvoiceDraft::new(GstMode::Exclusive);
    draft.add_line(medicine());
    draft.add_line(medicine());
    draft.add_line(
        LineItemInput::new(3, BigDecimal::from_str("249.50")?, BigDecimal::from(0))
            .with_tax_profile("IGST12"),
    );
    draft.add_line(LineItemInput::new(0, BigDecimal::from(40), BigDecimal::from(0)));
    draft.set_overall_discount(DiscountSpec::percent(BigDecimal::from(10)));

    let computation = engine.compute(&draft);
    for (index, outcome) in computation.lines.iter().enumerate() {
        match outcome {
            Ok(line) => print_line(index, line),
            Err(e) => println!("    {}. ❌ {}", index + 1, e),
        }
    }
    let totals = &computation.totals;
    println!();
    println!("  Invoice Summary:");
    println!("    Gross:          ₹{}", totals.gross_total);
    println!("    Discounts:      ₹{}", totals.discount_total);
    println!("    Net taxable:    ₹{}", totals.net_taxable_amount);
    for component in &totals.component_totals {
        println!("    {:<15} ₹{}", format!("{}:", component.name), component.amount);
    }
    println!("    Tax:            ₹{}", totals.tax_total);
    println!("    Net total:      ₹{}", totals.net_total);
    println!();

    // 5. Strict engine and alternative rounding
    println!("⚙️ Strict engine with largest-remainder rounding:");
    let strict = BillingEngine::with_config(
        catalog,
        EngineConfig::strict().with_component_rounding(ComponentRounding::LargestRemainder),
    );
    let unknown = LineItemInput::new(1, BigDecimal::from(100), BigDecimal::from(0))
        .with_tax_profile("GST99");
    match strict.calculate_line(&unknown, GstMode::Exclusive) {
        Ok(line) => println!("  ✓ total ₹{}", line.total),
        Err(e) => println!("  ❌ {}", e),
    }
    let line = strict.calculate_line(&medicine(), GstMode::Inclusive)?;
    print_line(0, &line);

    println!("\n🎉 Walkthrough completed successfully!");
    Ok(())
}
