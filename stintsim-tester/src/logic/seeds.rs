use anyhow::{Result, bail};

/// Resolve CLI seed tokens into concrete seeds.
///
/// Supports literal integers (negative values use their magnitude), hex
/// literals with a `0x` prefix, and the keyword `config`, which expands to
/// the seed stored in the loaded configuration.
pub fn resolve_seed_inputs(tokens: &[String], config_seed: u64) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let seed = if token.eq_ignore_ascii_case("config") {
            config_seed
        } else if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            match u64::from_str_radix(hex, 16) {
                Ok(value) => value,
                Err(_) => bail!("invalid hex seed: {token}"),
            }
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else {
            bail!("invalid seed: {token}");
        };

        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(config_seed);
    }
    Ok(seeds)
}
