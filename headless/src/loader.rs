use std::path::Path;

use sequoia_shared::{GuildClaim, GuildEntry, TerritoryMap};

type LoadResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub async fn load_territories(path: &Path) -> LoadResult<TerritoryMap> {
    let json = tokio::fs::read_to_string(path).await?;
    Ok(sequoia_shared::parse_territories(&json)?)
}

pub async fn load_guilds(path: &Path) -> LoadResult<Vec<GuildEntry>> {
    let json = tokio::fs::read_to_string(path).await?;
    Ok(sequoia_shared::parse_guilds(&json)?)
}

pub async fn load_claims(path: &Path) -> LoadResult<Vec<GuildClaim>> {
    let json = tokio::fs::read_to_string(path).await?;
    Ok(sequoia_shared::parse_claims(&json)?)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{load_claims, load_territories};

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sequoia-headless-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).expect("write scratch file");
        path
    }

    #[tokio::test]
    async fn loads_territories_from_disk() {
        let path = scratch_file(
            "territories.json",
            r#"{"Detlas": {"border": [0, 0, 100, 80], "trading_routes": ["Ragni"]}}"#,
        );
        let map = load_territories(&path).await.expect("territories");
        std::fs::remove_file(&path).ok();

        let detlas = map.get("Detlas").expect("Detlas");
        assert_eq!(detlas.trading_routes, vec!["Ragni".to_string()]);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("sequoia-headless-does-not-exist.json");
        assert!(load_claims(&path).await.is_err());
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let path = scratch_file("bad.json", "{ not json");
        let result = load_territories(&path).await;
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
