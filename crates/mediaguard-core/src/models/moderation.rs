//! Moderation verdicts and the policy that derives them from vendor annotations.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::likelihood::Likelihood;

/// Media type handled by a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Content-type prefix an upload must carry to be handled by this trigger.
    pub fn content_type_prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Whether a clear verdict is forwarded to the transcoding service.
    pub fn passes_through_when_clear(&self) -> bool {
        matches!(self, MediaKind::Video)
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            _ => Err(anyhow::anyhow!("Invalid media kind: {}", s)),
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Binary moderation outcome for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Flagged,
    Clear,
}

impl Verdict {
    pub fn is_flagged(&self) -> bool {
        matches!(self, Verdict::Flagged)
    }
}

impl From<bool> for Verdict {
    fn from(flagged: bool) -> Self {
        if flagged {
            Verdict::Flagged
        } else {
            Verdict::Clear
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Verdict::Flagged => f.write_str("flagged"),
            Verdict::Clear => f.write_str("clear"),
        }
    }
}

/// Whole-image safe-search result. Missing categories are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnnotation {
    pub adult: Option<Likelihood>,
    pub violence: Option<Likelihood>,
}

impl ImageAnnotation {
    pub fn new(adult: Likelihood, violence: Likelihood) -> Self {
        Self {
            adult: Some(adult),
            violence: Some(violence),
        }
    }

    /// Flagged iff adult or violence is `POSSIBLE` or worse.
    pub fn verdict(&self) -> Verdict {
        let adult = self.adult.unwrap_or_default();
        let violence = self.violence.unwrap_or_default();
        Verdict::from(adult.is_at_least_possible() || violence.is_at_least_possible())
    }
}

/// Per-frame explicit-content result for a video, in frame order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAnnotation {
    pub frames: Vec<Likelihood>,
}

impl VideoAnnotation {
    pub fn new(frames: Vec<Likelihood>) -> Self {
        Self { frames }
    }

    /// Flagged iff any frame is `POSSIBLE` or worse. No frames means clear.
    pub fn verdict(&self) -> Verdict {
        Verdict::from(self.frames.iter().any(Likelihood::is_at_least_possible))
    }
}

/// Classifier output, specific to the media type that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Annotation {
    Image(ImageAnnotation),
    Video(VideoAnnotation),
}

impl Annotation {
    pub fn verdict(&self) -> Verdict {
        match self {
            Annotation::Image(image) => image.verdict(),
            Annotation::Video(video) => video.verdict(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Annotation::Image(_) => MediaKind::Image,
            Annotation::Video(_) => MediaKind::Video,
        }
    }

    /// Most severe likelihood seen, for logging.
    pub fn peak(&self) -> Likelihood {
        match self {
            Annotation::Image(image) => image
                .adult
                .unwrap_or_default()
                .max(image.violence.unwrap_or_default()),
            Annotation::Video(video) => video.frames.iter().copied().max().unwrap_or_default(),
        }
    }
}
