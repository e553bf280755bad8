//! Output formatting for analysis results (table, JSON, markdown, CSV).

use crate::analysis::{AnalysisResult, Recommendation};
use crate::config::OutputFormat;

const DIVIDER: &str =
    "====================================================================";
const SUB_DIVIDER: &str =
    "--------------------------------------------------------------------";

/// Formats analysis results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single analysis as a full report.
    pub fn format_analysis(&self, analysis: &AnalysisResult) -> String {
        match self.format {
            OutputFormat::Json => self.json_single(analysis),
            OutputFormat::Table => self.table_single(analysis),
            OutputFormat::Markdown => self.markdown_single(analysis),
            OutputFormat::Csv => self.csv_analyses(std::slice::from_ref(analysis)),
        }
    }

    /// Formats a list of analyses for browsing.
    pub fn format_analyses(&self, analyses: &[AnalysisResult]) -> String {
        if analyses.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No analyses found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_analyses(analyses),
            OutputFormat::Table => self.table_analyses(analyses),
            OutputFormat::Markdown => self.markdown_analyses(analyses),
            OutputFormat::Csv => self.csv_analyses(analyses),
        }
    }

    // JSON formatting

    fn json_single(&self, analysis: &AnalysisResult) -> String {
        serde_json::to_string_pretty(analysis).unwrap_or_else(|_| "{}".to_string())
    }

    fn json_analyses(&self, analyses: &[AnalysisResult]) -> String {
        serde_json::to_string_pretty(analyses).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_single(&self, analysis: &AnalysisResult) -> String {
        let mut lines = Vec::new();
        let deal = &analysis.source_deal;

        lines.push(DIVIDER.to_string());
        lines.push("LEGO DEAL ANALYZER - COMPREHENSIVE REPORT".to_string());
        lines.push(DIVIDER.to_string());
        lines.push(String::new());

        lines.push("SOURCE DEAL".to_string());
        lines.push(format!("  Title:       {}", deal.title));
        if let Some(set) = &deal.set_number {
            lines.push(format!("  Set:         {}", set));
        }
        lines.push(format!(
            "  Price:       {} ({} with shipping)",
            money(analysis.purchase_price),
            money(analysis.purchase_price_with_shipping)
        ));
        lines.push(format!(
            "  Temperature: {}° | Age: {} days | Comments: {}",
            deal.temperature, analysis.source_deal_age, deal.comments_count
        ));
        lines.push(format!("  Link:        {}", deal.link));
        lines.push(String::new());

        lines.push("MARKET ANALYSIS".to_string());
        lines.push(format!(
            "  Found {} new-condition listings out of {} total",
            analysis.new_condition_listings_count, analysis.listings_count
        ));

        if analysis.recommendation == Recommendation::InsufficientData {
            lines.push(String::new());
            lines.push("  No usable market data for this set.".to_string());
            lines.push(format!("  RECOMMENDATION: {}", analysis.recommendation));
            lines.push(DIVIDER.to_string());
            return lines.join("\n");
        }

        lines.push(format!("  Average Price:     {}", money(analysis.average_selling_price)));
        lines.push(format!("  Median Price:      {}", money(analysis.median_selling_price)));
        lines.push(format!(
            "  Price Range:       {} - {}",
            money(analysis.lower_quartile_price),
            money(analysis.upper_quartile_price)
        ));
        lines.push(format!(
            "  Price Stability:   CV {}% ({} std dev)",
            number(analysis.coefficient_of_variation),
            money(analysis.price_standard_deviation)
        ));
        lines.push(format!(
            "  Avg Condition:     {} | Avg Favorites: {}",
            number(analysis.average_condition),
            number(analysis.average_favorites)
        ));
        lines.push(String::new());

        lines.push("PROFITABILITY".to_string());
        lines.push(format!(
            "  Est. Net Profit:   {} ({} ROI)",
            money(analysis.estimated_net_profit),
            analysis
                .profit_percentage
                .map(|p| format!("{:.2}%", p))
                .unwrap_or_else(|| "N/A".to_string())
        ));
        lines.push(format!("  Potential Profit:  {}", money(analysis.potential_profit)));
        lines.push(String::new());

        lines.push(SUB_DIVIDER.to_string());
        lines.push(format!(
            "OVERALL DEAL SCORE: {}/100  {}",
            analysis.deal_score,
            progress_bar(analysis.deal_score as u32, 100)
        ));
        lines.push(format!("RECOMMENDATION: {}", analysis.recommendation));
        lines.push(SUB_DIVIDER.to_string());
        lines.push(String::new());

        let b = &analysis.score_breakdown;
        lines.push("SCORE BREAKDOWN".to_string());
        lines.push(score_row("Percentile", b.percentile_score, 15));
        lines.push(score_row("Profit", b.profit_score, 25));
        lines.push(score_row("Market", b.market_score, 20));
        lines.push(score_row("Deal Quality", b.deal_quality_score, 15));
        lines.push(score_row("Liquidity", b.liquidity_score, 15));
        lines.push(score_row("Risk", b.risk_score, 10));
        lines.push(String::new());

        lines.push(format!("Analysis timestamp: {}", analysis.timestamp.to_rfc3339()));
        lines.push(DIVIDER.to_string());

        lines.join("\n")
    }

    fn table_analyses(&self, analyses: &[AnalysisResult]) -> String {
        let set_width = 8;
        let price_width = 9;
        let score_width = 5;
        let profit_width = 9;
        let title_width = 40;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<set_width$}  {:>price_width$}  {:>score_width$}  {:>profit_width$}  {:<24}  {}",
            "Set", "Price", "Score", "Profit", "Recommendation", "Title"
        ));
        lines.push(format!(
            "{:-<set_width$}  {:-<price_width$}  {:-<score_width$}  {:-<profit_width$}  {:-<24}  {:-<title_width$}",
            "", "", "", "", "", ""
        ));

        for analysis in analyses {
            let set = analysis.source_deal.set_number.as_deref().unwrap_or("N/A");
            let title = truncate(&analysis.source_deal.title, title_width);

            lines.push(format!(
                "{:<set_width$}  {:>price_width$}  {:>score_width$}  {:>profit_width$}  {:<24}  {}",
                set,
                money(analysis.purchase_price),
                analysis.deal_score,
                money(analysis.estimated_net_profit),
                truncate(&analysis.recommendation.to_string(), 24),
                title
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} analyses", analyses.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_single(&self, analysis: &AnalysisResult) -> String {
        let mut lines = Vec::new();
        let deal = &analysis.source_deal;

        lines.push(format!("## {}", deal.title));
        lines.push(String::new());

        if let Some(set) = &deal.set_number {
            lines.push(format!("- **Set:** {}", set));
        }
        lines.push(format!("- **Deal:** [{}]({})", money(analysis.purchase_price), deal.link));
        lines.push(format!("- **Score:** {}/100", analysis.deal_score));
        lines.push(format!("- **Recommendation:** {}", analysis.recommendation));

        if analysis.recommendation != Recommendation::InsufficientData {
            lines.push(format!(
                "- **Net Profit:** {} ({} ROI)",
                money(analysis.estimated_net_profit),
                analysis
                    .profit_percentage
                    .map(|p| format!("{:.2}%", p))
                    .unwrap_or_else(|| "N/A".to_string())
            ));
            lines.push(format!(
                "- **Market:** {} listings, avg {}",
                analysis.new_condition_listings_count,
                money(analysis.average_selling_price)
            ));
            lines.push(String::new());

            let b = &analysis.score_breakdown;
            lines.push("| Bucket | Score | Max |".to_string());
            lines.push("|--------|-------|-----|".to_string());
            lines.push(format!("| Percentile | {} | 15 |", b.percentile_score));
            lines.push(format!("| Profit | {} | 25 |", b.profit_score));
            lines.push(format!("| Market | {} | 20 |", b.market_score));
            lines.push(format!("| Deal Quality | {} | 15 |", b.deal_quality_score));
            lines.push(format!("| Liquidity | {} | 15 |", b.liquidity_score));
            lines.push(format!("| Risk | {} | 10 |", b.risk_score));
        }

        lines.join("\n")
    }

    fn markdown_analyses(&self, analyses: &[AnalysisResult]) -> String {
        let mut lines = Vec::new();

        lines.push("| Set | Price | Score | Profit | Recommendation | Title |".to_string());
        lines.push("|-----|-------|-------|--------|----------------|-------|".to_string());

        for analysis in analyses {
            let set = analysis.source_deal.set_number.as_deref().unwrap_or("N/A");
            let title = truncate(&analysis.source_deal.title, 40);

            lines.push(format!(
                "| {} | {} | {} | {} | {} | [{}]({}) |",
                set,
                money(analysis.purchase_price),
                analysis.deal_score,
                money(analysis.estimated_net_profit),
                analysis.recommendation,
                title,
                analysis.source_deal.link
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} analyses found*", analyses.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "set_number,title,price,price_with_shipping,deal_score,net_profit,roi,recommendation,listings,eligible_listings,link"
            .to_string()
    }

    fn csv_analyses(&self, analyses: &[AnalysisResult]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for analysis in analyses {
            let deal = &analysis.source_deal;
            lines.push(format!(
                "{},{},{},{},{},{},{},{},{},{},{}",
                deal.set_number.as_deref().unwrap_or_default(),
                Self::csv_escape(&deal.title),
                csv_number(analysis.purchase_price),
                csv_number(analysis.purchase_price_with_shipping),
                analysis.deal_score,
                csv_number(analysis.estimated_net_profit),
                csv_number(analysis.profit_percentage),
                Self::csv_escape(&analysis.recommendation.to_string()),
                analysis.listings_count,
                analysis.new_condition_listings_count,
                deal.link
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

fn money(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2} EUR", v)).unwrap_or_else(|| "N/A".to_string())
}

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "N/A".to_string())
}

fn csv_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

fn progress_bar(score: u32, max: u32) -> String {
    let bar_length = 20;
    let filled = ((score as f64 / max as f64) * bar_length as f64).round() as usize;
    let filled = filled.min(bar_length);
    format!("{}{}", "#".repeat(filled), "-".repeat(bar_length - filled))
}

fn score_row(label: &str, score: u8, max: u8) -> String {
    format!(
        "  {:<14} {:>5}  {}",
        label,
        format!("{}/{}", score, max),
        progress_bar(score as u32, max as u32)
    )
}
