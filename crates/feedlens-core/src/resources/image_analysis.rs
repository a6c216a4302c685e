// crates/feedlens-core/src/resources/image_analysis.rs
// ============================================================================
// Module: Image Analysis Resource
// Description: Typed per-image visual analysis payload and its checks.
// Purpose: Catch duplicate media and palette drift in image analysis data.
// Dependencies: crate::consistency, serde
// ============================================================================

//! ## Overview
//! Each analyzed post lists its images with a model description and a dominant
//! color palette. Palette proportions of one image are expected to sum to at
//! most one; small rounding is tolerated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use super::Resource;
use crate::consistency::ConsistencyReport;
use crate::consistency::WarningKind;
use crate::consistency::mean;
use crate::resource::ResourceKind;

/// Palette proportion sum tolerated before a drift warning.
pub const PALETTE_TOLERANCE: f64 = 1.01;

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Visual analysis of an account's posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Account analyzed.
    pub username: String,
    /// Reported number of analyzed posts.
    pub total_posts_analyzed: u64,
    /// Analyzed posts; empty when no analysis exists yet.
    pub posts_analyzed: Vec<AnalyzedPost>,
}

/// One analyzed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedPost {
    /// Post identifier.
    pub post_id: String,
    /// Post caption.
    pub caption: String,
    /// Post media type.
    pub post_type: String,
    /// Analyzed images of the post.
    pub images: Vec<AnalyzedImage>,
}

/// One analyzed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedImage {
    /// Image file name.
    pub file_name: String,
    /// Storage path of the image.
    pub object_path: String,
    /// Model description of the image.
    pub gpt4o_analysis: String,
    /// Dominant colors.
    pub color_palette: Vec<PaletteColor>,
}

/// One dominant color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteColor {
    /// Red, green, and blue channels.
    pub rgb: [u8; 3],
    /// Share of the image covered by the color.
    pub proportion: f64,
}

// ============================================================================
// SECTION: Consistency
// ============================================================================

impl Resource for ImageAnalysis {
    const KIND: ResourceKind = ResourceKind::ImageAnalysis;

    fn analyze(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::new();
        let posts = &self.posts_analyzed;
        report.check_count("total_posts_analyzed", self.total_posts_analyzed, posts.len());
        report.check_duplicates("posts_analyzed", posts.iter().map(|post| post.post_id.as_str()));
        let images = move || posts.iter().flat_map(|post| post.images.iter());
        report.check_duplicates(
            "images.object_path",
            images().map(|image| image.object_path.as_str()),
        );

        for post in posts {
            for image in &post.images {
                let sum: f64 = image.color_palette.iter().map(|color| color.proportion).sum();
                if sum > PALETTE_TOLERANCE {
                    report.warn(
                        WarningKind::ProportionDrift,
                        format!(
                            "palette proportions of {} in post {} sum to {sum:.3}",
                            image.object_path, post.post_id
                        ),
                        vec![image.object_path.clone()],
                    );
                }
            }
        }

        let image_count = images().count();
        let palette_entries: usize = images().map(|image| image.color_palette.len()).sum();
        let analysis_chars: usize =
            images().map(|image| image.gpt4o_analysis.chars().count()).sum();
        let caption_chars: usize = posts.iter().map(|post| post.caption.chars().count()).sum();
        let without_analysis =
            images().filter(|image| image.gpt4o_analysis.trim().is_empty()).count();
        report.record_count("posts", posts.len());
        report.record_count("total_images", image_count);
        report.record_count("images_without_analysis", without_analysis);
        #[allow(clippy::cast_precision_loss, reason = "Payload sizes stay far below 2^52.")]
        {
            report.record_stat("average_images_per_post", mean(image_count as f64, posts.len()));
            report.record_stat("average_palette_size", mean(palette_entries as f64, image_count));
            report.record_stat("average_analysis_length", mean(analysis_chars as f64, image_count));
            report.record_stat("average_caption_length", mean(caption_chars as f64, posts.len()));
        }
        report
    }
}
