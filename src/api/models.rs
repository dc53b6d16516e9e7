use serde::Deserialize;

// League V4 entries page
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct LeagueEntryDto {
    #[serde(default)]
    pub summoner_id: String,
    #[serde(default)]
    pub summoner_name: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub league_points: i32,
    #[serde(default)]
    pub wins: i32,
    #[serde(default)]
    pub losses: i32,
}

// Summoner V4 response
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SummonerDto {
    #[serde(default)]
    pub id: String,
    pub puuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summoner_level: i32,
}

// Champion Mastery V4 response
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChampionMasteryDto {
    pub champion_id: i64,
    #[serde(default)]
    pub champion_level: i32,
    #[serde(default)]
    pub champion_points: i64,
}

// Match V5 response
#[derive(Debug, Deserialize, Clone)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct MatchMetadata {
    pub match_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    #[serde(default)]
    pub game_creation: i64,
    #[serde(default)]
    pub game_duration: i64,
    #[serde(default)]
    pub queue_id: i64,
    #[serde(default)]
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ParticipantDto {
    #[serde(default)]
    pub puuid: String,
    #[serde(default)]
    pub champion_id: i32,
    #[serde(default)]
    pub champion_name: String,
    #[serde(default)]
    pub team_id: i32,
    #[serde(default)]
    pub win: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_payload_tolerates_missing_fields() {
        // gameDuration and queueId absent, one participant missing its champion name
        let raw = r#"{
            "metadata": { "matchId": "NA1_100" },
            "info": {
                "gameCreation": 1700000000000,
                "participants": [
                    { "puuid": "p1", "championName": "Ahri", "teamId": 100, "win": true },
                    { "puuid": "p2", "teamId": 200 }
                ]
            }
        }"#;

        let parsed: MatchDto = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.metadata.match_id, "NA1_100");
        assert_eq!(parsed.info.game_duration, 0);
        assert_eq!(parsed.info.participants.len(), 2);
        assert_eq!(parsed.info.participants[0].champion_name, "Ahri");
        assert!(parsed.info.participants[1].champion_name.is_empty());
        assert!(!parsed.info.participants[1].win);
    }

    #[test]
    fn league_page_deserializes() {
        let raw = r#"[
            { "summonerId": "s1", "summonerName": "PlayerOne", "tier": "BRONZE",
              "rank": "I", "leaguePoints": 42, "wins": 10, "losses": 5 }
        ]"#;

        let entries: Vec<LeagueEntryDto> = serde_json::from_str(raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].summoner_name, "PlayerOne");
        assert_eq!(entries[0].wins, 10);
    }
}
