//! Risk dashboard: KPIs, level distribution, top ports, and map points.

use serde::Serialize;

use crate::agent::{PortRiskRecord, RiskLevel};

/// Ports listed in the "highest risk" table.
pub const TOP_PORTS: usize = 6;

/// Known port coordinates as `(name, lat, lon)`.
const PORT_COORDINATES: [(&str, f64, f64); 8] = [
    ("Shanghai", 31.23, 121.47),
    ("Los Angeles", 33.72, -118.27),
    ("Hong Kong", 22.32, 114.17),
    ("Singapore", 1.26, 103.82),
    ("Rotterdam", 51.92, 4.48),
    ("Hamburg", 53.55, 9.99),
    ("Shenzhen", 22.54, 114.06),
    ("Busan", 35.18, 129.08),
];

pub fn port_coordinates(port_name: &str) -> Option<(f64, f64)> {
    PORT_COORDINATES
        .iter()
        .find(|(name, _, _)| *name == port_name)
        .map(|&(_, lat, lon)| (lat, lon))
}

/// Badge colour class for a continuous risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    High,
    Medium,
    Low,
}

impl Badge {
    pub fn for_risk(risk: f64) -> Self {
        if risk > 0.4 {
            Self::High
        } else if risk > 0.2 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedPort {
    pub port_name: String,
    pub country: String,
    pub overall_risk: f64,
    pub risk_level: RiskLevel,
    pub badge: Badge,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapPoint {
    pub port_name: String,
    pub lat: f64,
    pub lon: f64,
    pub overall_risk: f64,
    pub risk_level: RiskLevel,
    pub nearby_disasters_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: RiskLevel,
    pub count: usize,
}

/// Everything the dashboard panel renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub ports_monitored: usize,
    pub avg_risk: f64,
    pub high_risk_count: usize,
    pub total_news_mentions: u64,
    /// Non-zero counts only, ordered HIGH, MEDIUM, LOW.
    pub distribution: Vec<LevelCount>,
    pub top_risky: Vec<RankedPort>,
    pub map_points: Vec<MapPoint>,
}

impl DashboardSummary {
    pub fn from_records(records: &[PortRiskRecord]) -> Self {
        let ports_monitored = records.len();
        let avg_risk = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.overall_risk).sum::<f64>() / ports_monitored as f64
        };

        let distribution = RiskLevel::ALL
            .iter()
            .map(|&level| LevelCount {
                level,
                count: records.iter().filter(|r| r.risk_level == level).count(),
            })
            .filter(|c| c.count > 0)
            .collect();

        Self {
            ports_monitored,
            avg_risk,
            high_risk_count: records
                .iter()
                .filter(|r| r.risk_level == RiskLevel::High)
                .count(),
            total_news_mentions: records.iter().map(|r| u64::from(r.news_mentions)).sum(),
            distribution,
            top_risky: top_risky(records, TOP_PORTS),
            map_points: map_points(records),
        }
    }
}

/// The `n` riskiest records, highest first. Ties keep input order.
pub fn top_risky(records: &[PortRiskRecord], n: usize) -> Vec<RankedPort> {
    let mut sorted: Vec<&PortRiskRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.overall_risk.total_cmp(&a.overall_risk));
    sorted
        .into_iter()
        .take(n)
        .map(|r| RankedPort {
            port_name: r.port_name.clone(),
            country: r.country.clone(),
            overall_risk: r.overall_risk,
            risk_level: r.risk_level,
            badge: Badge::for_risk(r.overall_risk),
        })
        .collect()
}

/// Map markers for records with known coordinates.
pub fn map_points(records: &[PortRiskRecord]) -> Vec<MapPoint> {
    records
        .iter()
        .filter_map(|r| {
            let (lat, lon) = port_coordinates(&r.port_name)?;
            Some(MapPoint {
                port_name: r.port_name.clone(),
                lat,
                lon,
                overall_risk: r.overall_risk,
                risk_level: r.risk_level,
                nearby_disasters_count: r.nearby_disasters_count,
            })
        })
        .collect()
}
