// Colored terminal output for labels, scores and lookup reports.
//
// This module handles all terminal-specific formatting. The main.rs
// command handlers delegate here.

use colored::Colorize;

use crate::catalog::models::{BrandedProduct, GenericCandidate};
use crate::matching::normalize::NormalizedLabel;
use crate::matching::similarity::ScoreBreakdown;
use crate::pipeline::lookup::LookupReport;

/// Display the normalized form of a label.
pub fn display_normalized(raw: &str, label: &NormalizedLabel) {
    println!("\n{}", format!("=== Normalized: {raw} ===").bold());
    println!("  Clean text: {}", label.clean_text());

    let tokens: Vec<&str> = label.tokens().iter().map(String::as_str).collect();
    println!("  Tokens:     {}", tokens.join(", "));

    if label.ingredients().is_empty() {
        println!("  Ingredients: {}", "none found".dimmed());
        return;
    }
    println!("  Ingredients:");
    for ingredient in label.ingredient_list() {
        println!("    {:<24} {:>10.3} mg", ingredient.name, ingredient.dose_mg);
    }
}

/// Display every term of one similarity comparison.
pub fn display_breakdown(branded: &str, generic: &str, breakdown: &ScoreBreakdown, threshold: f64) {
    println!("\n{}", "=== Similarity ===".bold());
    println!("  Branded: {branded}");
    println!("  Generic: {generic}");
    println!("  Name similarity:       {:.3}", breakdown.name_similarity);

    match &breakdown.ingredient {
        Some(ing) => {
            println!("  Common ingredients:    {}", ing.common.join(", "));
            println!("  Coverage:              {:.3}", ing.coverage);
            println!("  Dosage score:          {:.3}", ing.dosage_score);
            println!("  Ingredient similarity: {:.3}", ing.combined);
        }
        None => println!(
            "  {}",
            "No common ingredients, score is name similarity only".dimmed()
        ),
    }

    println!(
        "  Score: {}",
        colorize_score(breakdown.score, threshold)
    );
}

/// Display ranked generic candidates for one salt composition.
pub fn display_ranked(salt: &str, ranked: &[GenericCandidate], threshold: f64) {
    if ranked.is_empty() {
        println!("No generic candidates with a name to compare against.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Generic candidates for \"{salt}\" ===").bold()
    );
    println!();
    println!(
        "  {:>4}  {:<44} {:>6}  {:>8}  {:<16}",
        "Rank".dimmed(),
        "Generic".dimmed(),
        "Score".dimmed(),
        "Price".dimmed(),
        "Unit".dimmed(),
    );
    println!("  {}", "-".repeat(84).dimmed());

    for (i, candidate) in ranked.iter().enumerate() {
        let name = super::truncate_chars(candidate.generic_name.as_deref().unwrap_or(""), 41);
        let price = candidate
            .price
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>4}. {:<44} {:>6}  {:>8}  {:<16}",
            i + 1,
            name,
            colorize_score(candidate.similarity_score.unwrap_or(0.0), threshold),
            price,
            candidate.unit_size.as_deref().unwrap_or(""),
        );
    }
    println!();
}

/// Display a branded product found by name search.
pub fn display_product(product: &BrandedProduct) {
    println!("\n{}", format!("=== {} ===", product.name).bold());
    print_field("Salt composition", product.salt_composition.as_deref());
    print_field("Manufacturer", product.manufacturer_name.as_deref());
    print_field("Pack size", product.pack_size_label.as_deref());
    if let Some(price) = product.price {
        println!("  {:<17} {:.2}", "Price:", price);
    }
    if let Some(desc) = &product.medicine_desc {
        println!("  {:<17} {}", "Description:", super::truncate_chars(desc, 160).dimmed());
    }
}

/// Display a full lookup report.
pub fn display_report(report: &LookupReport, threshold: f64) {
    println!("\n{}", format!("=== {} ===", report.name).bold());
    println!("  Salt composition: {}", report.salt_composition);
    if !report.manufacturer.is_empty() {
        println!("  Manufacturer:     {}", report.manufacturer);
    }
    if !report.pack_size.is_empty() {
        println!("  Pack size:        {}", report.pack_size);
    }
    println!("  Price:            {:.2}", report.price);

    let Some(generic) = &report.generic else {
        println!("\n  {}", "No generic alternatives in the catalog.".yellow());
        return;
    };

    println!("\n  {}", "Generic alternative:".bold());
    println!("    Name:   {}", generic.generic_name);
    if !generic.unit_size.is_empty() {
        println!("    Unit:   {}", generic.unit_size);
    }
    println!("    Price:  {:.2}", generic.price);
    println!(
        "    Score:  {}",
        colorize_score(generic.similarity_score, threshold)
    );

    if !report.confident {
        println!(
            "    {}",
            format!("Below the {threshold:.2} acceptance threshold. Check the composition.")
                .yellow()
        );
    }
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        println!("  {:<17} {}", format!("{label}:"), value);
    }
}

/// Color a similarity score against the acceptance threshold.
fn colorize_score(score: f64, threshold: f64) -> colored::ColoredString {
    let text = format!("{score:.3}");
    if score >= threshold {
        text.green().bold()
    } else if score >= threshold / 2.0 {
        text.yellow()
    } else {
        text.red()
    }
}
