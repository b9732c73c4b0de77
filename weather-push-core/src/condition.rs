//! Mapping from raw Caiyun weather codes to human-readable labels and icons.

/// Sky condition reported by the Caiyun API, as a tagged enum.
///
/// Variants are ordered by display priority: snow before rain, rain before
/// fog/dust/haze, haze before wind, wind before cloud cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkyCondition {
    StormSnow,
    HeavySnow,
    ModerateSnow,
    LightSnow,
    StormRain,
    HeavyRain,
    ModerateRain,
    LightRain,
    Fog,
    Sand,
    Dust,
    HeavyHaze,
    ModerateHaze,
    LightHaze,
    Wind,
    Cloudy,
    PartlyCloudyDay,
    PartlyCloudyNight,
    ClearDay,
    ClearNight,
    Unknown,
}

impl SkyCondition {
    /// Parse a raw `skycon` code. Unrecognized codes map to [`Self::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "STORM_SNOW" => Self::StormSnow,
            "HEAVY_SNOW" => Self::HeavySnow,
            "MODERATE_SNOW" => Self::ModerateSnow,
            "LIGHT_SNOW" => Self::LightSnow,
            "STORM_RAIN" => Self::StormRain,
            "HEAVY_RAIN" => Self::HeavyRain,
            "MODERATE_RAIN" => Self::ModerateRain,
            "LIGHT_RAIN" => Self::LightRain,
            "FOG" => Self::Fog,
            "SAND" => Self::Sand,
            "DUST" => Self::Dust,
            "HEAVY_HAZE" => Self::HeavyHaze,
            "MODERATE_HAZE" => Self::ModerateHaze,
            "LIGHT_HAZE" => Self::LightHaze,
            "WIND" => Self::Wind,
            "CLOUDY" => Self::Cloudy,
            "PARTLY_CLOUDY_DAY" => Self::PartlyCloudyDay,
            "PARTLY_CLOUDY_NIGHT" => Self::PartlyCloudyNight,
            "CLEAR_DAY" => Self::ClearDay,
            "CLEAR_NIGHT" => Self::ClearNight,
            _ => Self::Unknown,
        }
    }

    /// Chinese display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StormSnow => "暴雪",
            Self::HeavySnow => "大雪",
            Self::ModerateSnow => "中雪",
            Self::LightSnow => "小雪",
            Self::StormRain => "暴雨",
            Self::HeavyRain => "大雨",
            Self::ModerateRain => "中雨",
            Self::LightRain => "小雨",
            Self::Fog => "雾",
            Self::Sand => "沙尘暴",
            Self::Dust => "浮尘",
            Self::HeavyHaze => "重度雾霾",
            Self::ModerateHaze => "中度雾霾",
            Self::LightHaze => "轻度雾霾",
            Self::Wind => "大风",
            Self::Cloudy => "阴天",
            Self::PartlyCloudyDay | Self::PartlyCloudyNight => "多云",
            Self::ClearDay => "晴天",
            Self::ClearNight => "晴夜",
            Self::Unknown => "未知",
        }
    }

    pub fn is_snow(&self) -> bool {
        matches!(
            self,
            Self::StormSnow | Self::HeavySnow | Self::ModerateSnow | Self::LightSnow
        )
    }

    pub fn is_rain(&self) -> bool {
        matches!(
            self,
            Self::StormRain | Self::HeavyRain | Self::ModerateRain | Self::LightRain
        )
    }

    /// Icon for this condition, taking the measured precipitation rate (mm/h)
    /// into account.
    ///
    /// The match is priority-ordered: a snowy condition always takes the snow
    /// branch, even when the precipitation rate alone would qualify as rain.
    pub fn icon(&self, precipitation_mmh: f64) -> &'static str {
        match self {
            Self::StormSnow => "🌨️⚡",
            Self::HeavySnow => "🌨️🌨️",
            Self::ModerateSnow => "🌨️❄️",
            Self::LightSnow => "🌨️",
            _ if self.is_rain() || precipitation_mmh >= PRECIP_TRACE => {
                match PrecipIntensity::from_rate(precipitation_mmh) {
                    PrecipIntensity::Storm => "🌧️⚡",
                    PrecipIntensity::Heavy => "🌧️🌧️",
                    PrecipIntensity::Moderate => "🌧️💧",
                    _ => "🌧️",
                }
            }
            Self::Fog => "🌫️",
            Self::Sand | Self::Dust => "⛔",
            Self::HeavyHaze => "😷😷",
            Self::ModerateHaze => "😷",
            Self::LightHaze => "🌫️",
            Self::Wind => "🌪️",
            Self::Cloudy => "☁️",
            Self::PartlyCloudyDay | Self::PartlyCloudyNight => "⛅",
            _ => "☀️",
        }
    }
}

/// Rates below this (mm/h) count as no precipitation.
pub const PRECIP_TRACE: f64 = 0.0606;
const PRECIP_LIGHT_MAX: f64 = 0.8989;
const PRECIP_MODERATE_MAX: f64 = 2.8700;
const PRECIP_HEAVY_MAX: f64 = 12.8638;

/// Precipitation severity bucketed from an hourly rate in mm/h.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecipIntensity {
    None,
    Light,
    Moderate,
    Heavy,
    Storm,
}

impl PrecipIntensity {
    pub fn from_rate(rate_mmh: f64) -> Self {
        if rate_mmh < PRECIP_TRACE {
            Self::None
        } else if rate_mmh < PRECIP_LIGHT_MAX {
            Self::Light
        } else if rate_mmh < PRECIP_MODERATE_MAX {
            Self::Moderate
        } else if rate_mmh < PRECIP_HEAVY_MAX {
            Self::Heavy
        } else {
            Self::Storm
        }
    }

    /// Chinese severity label; empty for trace amounts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Light => "小雨",
            Self::Moderate => "中雨",
            Self::Heavy => "大雨",
            Self::Storm => "暴雨",
        }
    }
}

const COMPASS: [&str; 8] = ["北", "东北", "东", "东南", "南", "西南", "西", "西北"];

/// 8-point compass label for a wind bearing in degrees.
///
/// Sectors are 45° wide and centered on the cardinal/intercardinal bearings,
/// so 337.5°..22.5° (wrapping through 360°) is 北.
pub fn compass_label(degrees: f64) -> &'static str {
    let index = (((degrees + 22.5).rem_euclid(360.0)) / 45.0).floor() as usize % 8;
    COMPASS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skycon_code_roundtrip_labels() {
        assert_eq!(SkyCondition::from_code("STORM_SNOW").label(), "暴雪");
        assert_eq!(SkyCondition::from_code("LIGHT_RAIN").label(), "小雨");
        assert_eq!(SkyCondition::from_code("PARTLY_CLOUDY_NIGHT").label(), "多云");
        assert_eq!(SkyCondition::from_code("CLEAR_DAY").label(), "晴天");
        assert_eq!(SkyCondition::from_code("???").label(), "未知");
    }

    #[test]
    fn snow_wins_over_rain_level_precipitation() {
        // Storm-level rate on a snowy sky must stay in the snow branch.
        assert_eq!(SkyCondition::LightSnow.icon(15.0), "🌨️");
        assert_eq!(SkyCondition::StormSnow.icon(15.0), "🌨️⚡");
    }

    #[test]
    fn rain_icon_follows_precipitation_severity() {
        assert_eq!(SkyCondition::LightRain.icon(0.0), "🌧️");
        assert_eq!(SkyCondition::LightRain.icon(1.5), "🌧️💧");
        assert_eq!(SkyCondition::ModerateRain.icon(5.0), "🌧️🌧️");
        assert_eq!(SkyCondition::HeavyRain.icon(15.0), "🌧️⚡");
        // A clear sky with a measurable rate still shows rain.
        assert_eq!(SkyCondition::ClearDay.icon(0.5), "🌧️");
    }

    #[test]
    fn non_precipitation_icons() {
        assert_eq!(SkyCondition::Fog.icon(0.0), "🌫️");
        assert_eq!(SkyCondition::Sand.icon(0.0), "⛔");
        assert_eq!(SkyCondition::HeavyHaze.icon(0.0), "😷😷");
        assert_eq!(SkyCondition::Wind.icon(0.0), "🌪️");
        assert_eq!(SkyCondition::Cloudy.icon(0.0), "☁️");
        assert_eq!(SkyCondition::PartlyCloudyDay.icon(0.0), "⛅");
        assert_eq!(SkyCondition::ClearNight.icon(0.0), "☀️");
    }

    #[test]
    fn precipitation_buckets() {
        assert_eq!(PrecipIntensity::from_rate(0.05).label(), "");
        assert_eq!(PrecipIntensity::from_rate(0.5).label(), "小雨");
        assert_eq!(PrecipIntensity::from_rate(1.5).label(), "中雨");
        assert_eq!(PrecipIntensity::from_rate(5.0).label(), "大雨");
        assert_eq!(PrecipIntensity::from_rate(15.0).label(), "暴雨");
    }

    #[test]
    fn precipitation_bucket_boundaries() {
        assert_eq!(PrecipIntensity::from_rate(0.0605), PrecipIntensity::None);
        assert_eq!(PrecipIntensity::from_rate(0.0606), PrecipIntensity::Light);
        assert_eq!(PrecipIntensity::from_rate(0.8988), PrecipIntensity::Light);
        assert_eq!(PrecipIntensity::from_rate(0.8989), PrecipIntensity::Moderate);
        assert_eq!(PrecipIntensity::from_rate(2.8699), PrecipIntensity::Moderate);
        assert_eq!(PrecipIntensity::from_rate(2.8700), PrecipIntensity::Heavy);
        assert_eq!(PrecipIntensity::from_rate(12.8637), PrecipIntensity::Heavy);
        assert_eq!(PrecipIntensity::from_rate(12.8638), PrecipIntensity::Storm);
    }

    #[test]
    fn compass_eight_points() {
        assert_eq!(compass_label(0.0), "北");
        assert_eq!(compass_label(45.0), "东北");
        assert_eq!(compass_label(90.0), "东");
        assert_eq!(compass_label(135.0), "东南");
        assert_eq!(compass_label(180.0), "南");
        assert_eq!(compass_label(225.0), "西南");
        assert_eq!(compass_label(270.0), "西");
        assert_eq!(compass_label(315.0), "西北");
    }

    #[test]
    fn compass_wraps_at_north() {
        assert_eq!(compass_label(337.5), "北");
        assert_eq!(compass_label(360.0), "北");
        assert_eq!(compass_label(359.9), "北");
        assert_eq!(compass_label(22.4), "北");
    }
}
