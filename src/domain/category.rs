//! Closed vocabularies for region annotation, and the fixed category color mapping.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Category {
    #[strum(to_string = "Bullish Run-Up")]
    BullishRunUp,
    #[strum(to_string = "Bearish Run-Down")]
    BearishRunDown,
    #[strum(to_string = "Entry Region")]
    EntryRegion,
}

impl Category {
    pub fn color(self) -> RegionColor {
        match self {
            Self::BullishRunUp => RegionColor::Green,
            Self::BearishRunDown => RegionColor::Red,
            Self::EntryRegion => RegionColor::Blue,
        }
    }
}

/// Primary structural tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Feature1 {
    #[strum(to_string = "Order Block")]
    OrderBlock,
    #[strum(to_string = "Gap Up")]
    GapUp,
    #[strum(to_string = "Gap Down")]
    GapDown,
    #[strum(to_string = "Cumulative Delta Flip")]
    CumulativeDeltaFlip,
    #[strum(to_string = "High Vol on Short Candle")]
    HighVolOnShortCandle,
}

/// Secondary tag. `Plain` is the explicit "None" pick in the UI and is never stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Feature2 {
    #[strum(to_string = "None")]
    Plain,
    #[strum(to_string = "Volume Spike")]
    VolumeSpike,
    #[strum(to_string = "Trend Break")]
    TrendBreak,
    #[strum(to_string = "Inside Bar")]
    InsideBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum RegionColor {
    Green,
    Red,
    Blue,
    Grey,
}

impl RegionColor {
    /// Color for a raw category label. Labels outside the vocabulary map to grey.
    pub fn for_label(label: &str) -> Self {
        Category::from_str(label)
            .map(Category::color)
            .unwrap_or(RegionColor::Grey)
    }
}
