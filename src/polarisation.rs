use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TmmError;


/// Polarisation of the incident plane wave.
///
/// `S` has the electric field perpendicular to the plane of incidence,
/// `P` has it in the plane of incidence. Strings and characters are
/// validated once, here, so every downstream formula works on a known
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Polarisation {
    S,
    P,
}

impl FromStr for Polarisation {
    type Err = TmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" | "S" => Ok(Polarisation::S),
            "p" | "P" => Ok(Polarisation::P),
            _ => Err(TmmError::InvalidPolarisation(s.to_string())),
        }
    }
}

impl TryFrom<&str> for Polarisation {
    type Error = TmmError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for Polarisation {
    type Error = TmmError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<char> for Polarisation {
    type Error = TmmError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            's' | 'S' => Ok(Polarisation::S),
            'p' | 'P' => Ok(Polarisation::P),
            _ => Err(TmmError::InvalidPolarisation(c.to_string())),
        }
    }
}

impl From<Polarisation> for String {
    fn from(pol: Polarisation) -> Self {
        pol.to_string()
    }
}

impl fmt::Display for Polarisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarisation::S => write!(f, "s"),
            Polarisation::P => write!(f, "p"),
        }
    }
}
