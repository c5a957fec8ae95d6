use std::fmt;
use std::str::FromStr;

/// GNSS system identifier as reported in the `ConstellationType` column of `Raw` lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constellation {
    Unknown = 0,
    Gps = 1,
    Sbas = 2,
    Glonass = 3,
    Qzss = 4,
    Beidou = 5,
    Galileo = 6,
    Irnss = 7,
}

impl Constellation {
    /// Every system, in code order
    pub const ALL: [Constellation; 8] = [
        Constellation::Unknown,
        Constellation::Gps,
        Constellation::Sbas,
        Constellation::Glonass,
        Constellation::Qzss,
        Constellation::Beidou,
        Constellation::Galileo,
        Constellation::Irnss,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Constellation::Unknown => "UNKNOWN",
            Constellation::Gps => "GPS",
            Constellation::Sbas => "SBAS",
            Constellation::Glonass => "GLONASS",
            Constellation::Qzss => "QZSS",
            Constellation::Beidou => "BEIDOU",
            Constellation::Galileo => "GALILEO",
            Constellation::Irnss => "IRNSS",
        }
    }
}

impl fmt::Display for Constellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the decimal code as written in the log (`"3"` is GLONASS)
impl FromStr for Constellation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid constellation code '{}'", s.trim()))?;
        Constellation::from_code(code)
            .ok_or_else(|| format!("constellation code {} out of range 0-7", code))
    }
}

/// Measurement count and share for one system.
/// `count` and `percentage` are `None` when the system was never observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemStats {
    pub system: Constellation,
    pub count: Option<u64>,
    pub percentage: Option<f64>,
}

/// Per-system breakdown covering all eight codes
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationStats {
    systems: [SystemStats; 8],
}

impl ConstellationStats {
    /// Stats with every system present but unobserved
    pub fn empty() -> Self {
        Self {
            systems: Constellation::ALL.map(|system| SystemStats {
                system,
                count: None,
                percentage: None,
            }),
        }
    }

    pub fn get(&self, system: Constellation) -> &SystemStats {
        &self.systems[system as usize]
    }

    pub(crate) fn get_mut(&mut self, system: Constellation) -> &mut SystemStats {
        &mut self.systems[system as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemStats> {
        self.systems.iter()
    }

    pub fn count(&self, system: Constellation) -> Option<u64> {
        self.get(system).count
    }

    pub fn percentage(&self, system: Constellation) -> Option<f64> {
        self.get(system).percentage
    }

    /// Sum of the present counts
    pub fn total(&self) -> u64 {
        self.systems.iter().filter_map(|s| s.count).sum()
    }

    /// Systems with at least one measurement
    pub fn observed(&self) -> impl Iterator<Item = Constellation> + '_ {
        self.systems
            .iter()
            .filter(|s| s.count.is_some())
            .map(|s| s.system)
    }
}

impl Default for ConstellationStats {
    fn default() -> Self {
        Self::empty()
    }
}
