use crate::config::Config;
use crate::error::AppError;
use governor::{Quota, RateLimiter, state::{InMemoryState, NotKeyed}, clock::DefaultClock};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use super::models::*;

// Riot development keys allow 20 req/sec; 429s are retried with backoff on top.
const REQUESTS_PER_SECOND: u32 = 20;
const MAX_RETRIES: u32 = 3;

/// One remote query per method. The collector is generic over this trait so
/// collection runs can be driven by an in-memory fake in tests.
pub trait RiotApi {
    fn get_league_entries(
        &self,
        queue: &str,
        tier: &str,
        division: &str,
        page: u32,
    ) -> Result<Vec<LeagueEntryDto>, AppError>;

    fn get_summoner_by_name(&self, summoner_name: &str) -> Result<SummonerDto, AppError>;

    fn get_champion_masteries(&self, puuid: &str) -> Result<Vec<ChampionMasteryDto>, AppError>;

    fn get_match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError>;

    fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError>;

    fn get_champion_statistics(
        &self,
        query: &[(String, String)],
    ) -> Result<Vec<Map<String, Value>>, AppError>;
}

pub struct RiotApiClient {
    config: Config,
    agent: ureq::Agent,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RiotApiClient {
    pub fn new(config: Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        let rate_limiter = RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(REQUESTS_PER_SECOND).unwrap(),
        ));
        RiotApiClient {
            config,
            agent,
            rate_limiter,
        }
    }

    fn platform_host(&self) -> String {
        format!("https://{}.api.riotgames.com", self.config.region)
    }

    // Match-v5 lives on the regional clusters, not the platform hosts.
    fn regional_host(&self) -> String {
        let routing = match self.config.region.as_str() {
            "na1" | "br1" | "la1" | "la2" => "americas",
            "euw1" | "eun1" | "tr1" | "ru" => "europe",
            "kr" | "jp1" => "asia",
            "oc1" | "ph2" | "sg2" | "th2" | "vn2" => "sea",
            _ => "americas", // default
        };
        format!("https://{}.api.riotgames.com", routing)
    }

    fn wait_for_slot(&self) {
        while self.rate_limiter.check().is_err() {
            thread::sleep(Duration::from_millis(25));
        }
    }

    fn execute_request(&self, url: &str) -> Result<String, AppError> {
        let mut retry_count = 0;

        loop {
            self.wait_for_slot();

            let response = self
                .agent
                .get(url)
                .set("X-Riot-Token", &self.config.api_key)
                .set("User-Agent", "league_harvest/0.1.0")
                .call();

            match response {
                Ok(resp) => {
                    return resp
                        .into_string()
                        .map_err(|e| AppError::Transport(e.to_string()));
                }
                Err(ureq::Error::Status(429, resp)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait = retry_after(&resp).unwrap_or_else(|| {
                        Duration::from_millis(2000 * (retry_count + 1) as u64)
                    });
                    thread::sleep(wait);
                    retry_count += 1;
                }
                Err(ureq::Error::Status(404, _)) => {
                    return Err(AppError::NotFound(url.to_string()));
                }
                Err(ureq::Error::Status(code, _)) => {
                    return Err(AppError::ApiStatus {
                        status: code,
                        endpoint: url.to_string(),
                    });
                }
                Err(e) => {
                    return Err(AppError::Transport(e.to_string()));
                }
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let body = self.execute_request(url)?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }
}

impl RiotApi for RiotApiClient {
    fn get_league_entries(
        &self,
        queue: &str,
        tier: &str,
        division: &str,
        page: u32,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        let url = format!(
            "{}/lol/league/v4/entries/{}/{}/{}?page={}",
            self.platform_host(),
            queue,
            tier,
            division,
            page
        );
        self.get_json(&url)
    }

    fn get_summoner_by_name(&self, summoner_name: &str) -> Result<SummonerDto, AppError> {
        let url = format!(
            "{}/lol/summoner/v4/summoners/by-name/{}",
            self.platform_host(),
            summoner_name
        );
        match self.get_json(&url) {
            Err(AppError::NotFound(_)) => {
                Err(AppError::NotFound(format!("summoner '{}'", summoner_name)))
            }
            other => other,
        }
    }

    fn get_champion_masteries(&self, puuid: &str) -> Result<Vec<ChampionMasteryDto>, AppError> {
        let url = format!(
            "{}/lol/champion-mastery/v4/champion-masteries/by-puuid/{}",
            self.platform_host(),
            puuid
        );
        self.get_json(&url)
    }

    fn get_match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError> {
        let url = format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?start=0&count={}",
            self.regional_host(),
            puuid,
            count
        );
        self.get_json(&url)
    }

    fn get_match(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let url = format!("{}/lol/match/v5/matches/{}", self.regional_host(), match_id);
        self.get_json(&url)
    }

    fn get_champion_statistics(
        &self,
        query: &[(String, String)],
    ) -> Result<Vec<Map<String, Value>>, AppError> {
        // Aggregate statistics endpoint; rows are stored verbatim downstream.
        let url = with_query(
            format!("{}/lol/champion-stats/v1/aggregate", self.platform_host()),
            query,
        );
        self.get_json(&url)
    }
}

fn with_query(mut url: String, query: &[(String, String)]) -> String {
    for (idx, (key, value)) in query.iter().enumerate() {
        url.push(if idx == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(value);
    }
    url
}

fn retry_after(resp: &ureq::Response) -> Option<Duration> {
    resp.header("Retry-After")
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(region: &str) -> RiotApiClient {
        RiotApiClient::new(Config {
            api_key: "test-key".to_string(),
            region: region.to_string(),
            timeout_secs: 10,
        })
    }

    #[test]
    fn regional_routing_maps_platform_to_cluster() {
        assert_eq!(
            client_for("euw1").regional_host(),
            "https://europe.api.riotgames.com"
        );
        assert_eq!(
            client_for("kr").regional_host(),
            "https://asia.api.riotgames.com"
        );
        assert_eq!(
            client_for("na1").regional_host(),
            "https://americas.api.riotgames.com"
        );
        // Unknown platforms fall back to americas
        assert_eq!(
            client_for("xx9").regional_host(),
            "https://americas.api.riotgames.com"
        );
    }

    #[test]
    fn query_string_is_appended_in_order() {
        let query = vec![
            ("tier".to_string(), "DIAMOND".to_string()),
            ("queue".to_string(), "RANKED_SOLO_5x5".to_string()),
        ];
        assert_eq!(
            with_query("https://example.test/stats".to_string(), &query),
            "https://example.test/stats?tier=DIAMOND&queue=RANKED_SOLO_5x5"
        );
        assert_eq!(
            with_query("https://example.test/stats".to_string(), &[]),
            "https://example.test/stats"
        );
    }
}
