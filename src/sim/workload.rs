use rand::prelude::*;
use std::{fs::File, io::Read, path::Path};

use super::process::{ProcId, ProcessSpec};
use crate::{config::WorkloadConfig, error::ConfigError};

/// Bernoulli arrivals: each tick a process arrives with probability `p_arrival`,
/// short with probability `p_short`. Same seed, same list.
pub fn bernoulli(config: &WorkloadConfig) -> Vec<ProcessSpec> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut specs = Vec::new();

    for t in 0..config.ticks {
        if rng.random::<f64>() < config.p_arrival {
            let burst = if rng.random::<f64>() < config.p_short {
                config.short_burst
            } else {
                config.long_burst
            };
            let priority = rng.random_range(0..=config.max_priority);

            specs.push(ProcessSpec::new(
                specs.len() as ProcId + 1,
                t as i64,
                burst as i64,
                priority as i64,
            ));
        }
    }

    if specs.is_empty() {
        specs.push(ProcessSpec::new(1, 0, config.short_burst as i64, 0));
    }
    specs
}

/// Reads a JSON array of process specs; ids missing from the file are numbered by position.
pub fn from_json(reader: impl Read) -> Result<Vec<ProcessSpec>, ConfigError> {
    let mut specs: Vec<ProcessSpec> = serde_json::from_reader(reader)?;
    ProcessSpec::renumber(&mut specs);
    Ok(specs)
}

pub fn from_json_file(path: &Path) -> Result<Vec<ProcessSpec>, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_json(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bernoulli_is_reproducible() {
        let config = WorkloadConfig {
            seed: 7,
            ..WorkloadConfig::default()
        };
        assert_eq!(bernoulli(&config), bernoulli(&config));
    }

    #[test]
    fn test_bernoulli_respects_bounds() {
        let config = WorkloadConfig {
            ticks: 200,
            p_arrival: 0.5,
            ..WorkloadConfig::default()
        };
        let specs = bernoulli(&config);
        assert!(!specs.is_empty());
        for (i, spec) in specs.iter().enumerate() {
            assert_eq!(spec.id, i as ProcId + 1);
            assert!((0..200).contains(&spec.arrival));
            assert!(spec.burst == 2 || spec.burst == 6);
            assert!((0..=5).contains(&spec.priority));
        }
        assert!(specs.windows(2).all(|w| w[0].arrival < w[1].arrival));
    }

    #[test]
    fn test_bernoulli_never_empty() {
        let config = WorkloadConfig {
            p_arrival: 0.0,
            ..WorkloadConfig::default()
        };
        assert_eq!(bernoulli(&config), vec![ProcessSpec::new(1, 0, 2, 0)]);
    }

    #[test]
    fn test_from_json_numbers_missing_ids() {
        let json = r#"[
            { "arrival": 0, "burst": 3 },
            { "id": 9, "arrival": 2, "burst": 1, "priority": 4 }
        ]"#;
        let specs = from_json(json.as_bytes()).unwrap();
        assert_eq!(
            specs,
            vec![ProcessSpec::new(1, 0, 3, 0), ProcessSpec::new(9, 2, 1, 4)]
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            from_json("[{ \"arrival\": \"soon\" }]".as_bytes()),
            Err(ConfigError::Parse(_))
        ));
    }
}
