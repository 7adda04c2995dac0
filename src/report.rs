use std::fmt::Write;

use anyhow::Result;
use palate::Recommendations;
use palate_domain::{Confidence, Prediction, UserSimilarity};
use serde::Serialize;

const RULE_WIDTH: usize = 80;

pub struct Report<'a> {
    recommendations: &'a Recommendations,
    top: usize,
    scale: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    recommendations: &'a Recommendations,
    ranked: Vec<&'a Prediction>,
    top_predictions: Vec<&'a Prediction>,
    top_users: Vec<&'a UserSimilarity>,
    confidence: Confidence,
}

impl<'a> Report<'a> {
    pub fn new(recommendations: &'a Recommendations, top: usize, scale: f64) -> Self {
        Self {
            recommendations,
            top,
            scale,
        }
    }

    pub fn json(&self) -> Result<String> {
        let recommendations = self.recommendations;
        Ok(serde_json::to_string_pretty(&JsonReport {
            recommendations,
            ranked: recommendations.predictions.ranked(),
            top_predictions: recommendations.predictions.top(self.top),
            top_users: recommendations.similarities.top(self.top),
            confidence: recommendations.confidence(),
        })?)
    }

    pub fn text(&self) -> Result<String> {
        let mut out = String::new();
        self.write_summary(&mut out)?;
        self.write_ranked(&mut out)?;
        self.write_top_predictions(&mut out)?;
        self.write_top_users(&mut out)?;
        self.write_confidence(&mut out)?;
        self.write_gaps(&mut out)?;
        Ok(out)
    }

    fn write_summary(&self, out: &mut String) -> std::fmt::Result {
        let r = self.recommendations;
        writeln!(
            out,
            "Loaded data with {} users and {} restaurants from {}",
            r.users, r.items, r.source
        )?;
        writeln!(out)?;
        writeln!(out, "You have rated {} restaurants.", r.rated)?;
        writeln!(
            out,
            "Found {} restaurants you haven't rated yet.",
            r.unrated
        )
    }

    fn write_ranked(&self, out: &mut String) -> std::fmt::Result {
        heading(out, "RESTAURANT RECOMMENDATIONS (Sorted by Predicted Rating)")?;
        writeln!(out, "{:<6} {:<45} {:<15}", "Rank", "Restaurant", "Predicted Rating")?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        for (rank, prediction) in self.recommendations.predictions.ranked().iter().enumerate() {
            writeln!(
                out,
                "{:<6} {:<45} {:.2}/{}",
                rank + 1,
                prediction.item,
                prediction.rating,
                self.scale
            )?;
        }
        Ok(())
    }

    fn write_top_predictions(&self, out: &mut String) -> std::fmt::Result {
        heading(out, &format!("TOP {} RECOMMENDATIONS:", self.top))?;
        for (rank, prediction) in self
            .recommendations
            .predictions
            .top(self.top)
            .iter()
            .enumerate()
        {
            writeln!(
                out,
                "{}. {:<45} Predicted: {:.2}/{}",
                rank + 1,
                prediction.item,
                prediction.rating,
                self.scale
            )?;
        }
        Ok(())
    }

    fn write_top_users(&self, out: &mut String) -> std::fmt::Result {
        heading(out, &format!("TOP {} USERS WITH MOST SIMILAR TASTE:", self.top))?;
        for (rank, user) in self
            .recommendations
            .similarities
            .top(self.top)
            .iter()
            .enumerate()
        {
            writeln!(
                out,
                "{:<3}. {:<12} Similarity: {:.3}  (Based on {} common restaurants)",
                rank + 1,
                user.user,
                user.score,
                user.co_rated
            )?;
        }
        Ok(())
    }

    fn write_confidence(&self, out: &mut String) -> std::fmt::Result {
        let confidence = self.recommendations.confidence();
        heading(out, "CONFIDENCE ANALYSIS:")?;
        match confidence.mean_positive {
            Some(mean) => writeln!(out, "Average similarity score: {mean:.3}")?,
            None => writeln!(out, "Average similarity score: n/a")?,
        }
        writeln!(
            out,
            "Users with positive similarity: {}/{}",
            confidence.positive, confidence.total
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "Note: Predictions are more reliable for restaurants rated by similar users."
        )
    }

    fn write_gaps(&self, out: &mut String) -> std::fmt::Result {
        let r = self.recommendations;
        let no_data = r.predictions.no_data();
        if no_data.is_empty() && r.rejected.is_empty() && r.unknown_items.is_empty() {
            return Ok(());
        }

        heading(out, "NOT COVERED:")?;
        if !no_data.is_empty() {
            writeln!(out, "No ratings from anyone: {}", no_data.join(", "))?;
        }
        if !r.unknown_items.is_empty() {
            writeln!(
                out,
                "Your ratings for unknown restaurants were ignored: {}",
                r.unknown_items.join(", ")
            )?;
        }
        for row in &r.rejected {
            writeln!(out, "Skipped line {}: {}", row.line, row.reason)?;
        }
        Ok(())
    }
}

fn heading(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}
