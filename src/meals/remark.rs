use std::str::FromStr;

/// Closed vocabulary of meal remarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemarkTag {
    /// Added automatically when a category-flagged food is eaten.
    Staple,
    RiceLike,
    Walk,
    SkippedPrior,
}

impl RemarkTag {
    pub const ALL: [RemarkTag; 4] = [
        RemarkTag::Staple,
        RemarkTag::RiceLike,
        RemarkTag::Walk,
        RemarkTag::SkippedPrior,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RemarkTag::Staple => "staple",
            RemarkTag::RiceLike => "rice_like",
            RemarkTag::Walk => "walk",
            RemarkTag::SkippedPrior => "skipped",
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            RemarkTag::Staple => "主食(米)",
            RemarkTag::RiceLike => "米っぽいもの",
            RemarkTag::Walk => "食後散歩",
            RemarkTag::SkippedPrior => "前の食事抜き",
        }
    }
}

impl FromStr for RemarkTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RemarkTag::ALL
            .into_iter()
            .find(|tag| tag.key() == s)
            .ok_or(())
    }
}

/// Joins tag phrases for display: `主食(米), 食後散歩`.
pub fn phrases(tags: &[RemarkTag]) -> String {
    tags.iter()
        .map(|t| t.phrase())
        .collect::<Vec<_>>()
        .join(", ")
}
