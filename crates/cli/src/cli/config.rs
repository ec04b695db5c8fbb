use std::path::Path;

use bfi_domain::config::{Config, ConfigSeverity};
use bfi_providers::util::{resolve_api_key, store_in_keychain};

/// Parse and validate the config, printing any issues. Also checks that the
/// provider's API key can be resolved.
///
/// Returns `false` when errors were found.
pub fn validate(config: &Config, config_path: &Path) -> bool {
    let issues = config.validate();

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    let key_ok = match resolve_api_key(&config.llm.provider.auth) {
        Ok(_) => true,
        Err(e) => {
            println!("[ERROR] llm.provider.auth: {e}");
            false
        }
    };

    let error_count = error_count + usize::from(!key_ok);
    let valid = key_ok && !Config::has_errors(&issues);
    if error_count == 0 && warning_count == 0 {
        println!("Config OK ({})", config_path.display());
    } else {
        println!(
            "\n{error_count} error(s), {warning_count} warning(s) in {}",
            config_path.display(),
        );
    }

    valid
}

/// Dump the resolved config (with all defaults filled in) as TOML. A
/// plaintext key is masked.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(key) = config.llm.provider.auth.key.as_mut() {
        *key = mask(key);
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Prompt for an API key without echo and store it in the OS keychain.
pub fn set_secret(service: &str, account: &str) -> anyhow::Result<()> {
    let secret = rpassword::prompt_password_stderr(&format!("API key for {service}/{account}: "))?;
    let secret = secret.trim();
    if secret.is_empty() {
        anyhow::bail!("empty key; nothing stored");
    }
    store_in_keychain(service, account, secret)?;
    eprintln!("Stored. Point the config at it with:");
    eprintln!("  [llm.provider.auth]");
    eprintln!("  service = \"{service}\"");
    eprintln!("  account = \"{account}\"");
    Ok(())
}

fn mask(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if key.chars().count() <= 8 {
        "****".into()
    } else {
        format!("****{tail}")
    }
}
