use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::mapper::{lenient, Record};

/// Standard reply wrapper. If `status` is not `SUCCESS` there will be an
/// error `message`.
///
/// A `result` that is `null` or malformed decodes to `T::default()`, so a
/// failure reply still carries its status and message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
pub struct ApiResponse<T> {
    #[serde(default, deserialize_with = "lenient")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient")]
    pub result: T,
}

pub const STATUS_SUCCESS: &str = "SUCCESS";

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Rating block shared by members and player profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ratings {
    #[serde(deserialize_with = "lenient")]
    pub singles: String,
    #[serde(deserialize_with = "lenient")]
    pub singles_verified: String,
    #[serde(deserialize_with = "lenient")]
    pub singles_provisional: bool,
    #[serde(deserialize_with = "lenient")]
    pub doubles: String,
    #[serde(deserialize_with = "lenient")]
    pub doubles_verified: String,
    #[serde(deserialize_with = "lenient")]
    pub doubles_provisional: bool,
    #[serde(deserialize_with = "lenient")]
    pub default_rating: String,
}

impl Ratings {
    /// Rating shown in exports: the doubles rating.
    pub fn display(&self) -> &str {
        &self.doubles
    }
}

/// A member's role within a club.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClubRole {
    #[serde(deserialize_with = "lenient")]
    pub role_id: u64,
    #[serde(deserialize_with = "lenient")]
    pub role: String,
    #[serde(deserialize_with = "lenient")]
    pub approval_status: String,
    #[serde(deserialize_with = "lenient")]
    pub club_id: u64,
    #[serde(deserialize_with = "lenient")]
    pub created: String,
}

/// One hit of the club-members endpoint.
///
/// Rating fields arrive inline on the member object and are gathered into
/// [`Ratings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Member {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub dupr_id: String,
    #[serde(deserialize_with = "lenient")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient")]
    pub username: String,
    #[serde(deserialize_with = "lenient")]
    pub display_username: bool,
    #[serde(deserialize_with = "lenient")]
    pub email: String,
    #[serde(deserialize_with = "lenient")]
    pub verified_email: bool,
    #[serde(deserialize_with = "lenient")]
    pub phone: String,
    #[serde(deserialize_with = "lenient")]
    pub verified_phone: bool,
    #[serde(deserialize_with = "lenient")]
    pub iso_alpha2_code: String,
    #[serde(deserialize_with = "lenient")]
    pub short_address: String,
    #[serde(deserialize_with = "lenient")]
    pub formatted_address: String,
    #[serde(deserialize_with = "lenient")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient")]
    pub longitude: f64,
    #[serde(deserialize_with = "lenient")]
    pub gender: String,
    #[serde(deserialize_with = "lenient")]
    pub birthdate: String,
    #[serde(deserialize_with = "lenient")]
    pub age: u32,
    #[serde(deserialize_with = "lenient")]
    pub hand: String,
    #[serde(deserialize_with = "lenient")]
    pub image_url: String,
    #[serde(deserialize_with = "lenient")]
    pub status: String,
    #[serde(deserialize_with = "lenient")]
    pub club_id: u64,
    #[serde(deserialize_with = "lenient")]
    pub roles: Vec<ClubRole>,
    #[serde(flatten)]
    pub ratings: Ratings,
}

impl Record for Member {
    const KIND: &'static str = "member";
}

/// Player reference inside a match team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Player {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient")]
    pub dupr_id: String,
    #[serde(deserialize_with = "lenient")]
    pub image_url: String,
}

/// One side of a match. Unplayed games are reported as `-1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Team {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub serial: u32,
    #[serde(deserialize_with = "lenient")]
    pub player1: Player,
    #[serde(deserialize_with = "lenient")]
    pub player2: Player,
    #[serde(deserialize_with = "lenient")]
    pub game1: i32,
    #[serde(deserialize_with = "lenient")]
    pub game2: i32,
    #[serde(deserialize_with = "lenient")]
    pub game3: i32,
    #[serde(deserialize_with = "lenient")]
    pub game4: i32,
    #[serde(deserialize_with = "lenient")]
    pub game5: i32,
    #[serde(deserialize_with = "lenient")]
    pub winner: bool,
    #[serde(deserialize_with = "lenient")]
    pub delta: String,
    #[serde(deserialize_with = "lenient")]
    pub team_rating: String,
}

impl Team {
    /// Scores of the games actually played, in order.
    pub fn scores(&self) -> Vec<i32> {
        [self.game1, self.game2, self.game3, self.game4, self.game5]
            .into_iter()
            .filter(|score| *score >= 0)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoreFormat {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub format: String,
    #[serde(deserialize_with = "lenient")]
    pub games: u32,
    #[serde(deserialize_with = "lenient")]
    pub winning_score: u32,
}

/// One hit of the player-history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Match {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub match_id: u64,
    #[serde(deserialize_with = "lenient")]
    pub display_identity: String,
    #[serde(deserialize_with = "lenient")]
    pub venue: String,
    #[serde(deserialize_with = "lenient")]
    pub location: String,
    #[serde(deserialize_with = "lenient")]
    pub league: String,
    #[serde(deserialize_with = "lenient")]
    pub event_date: String,
    #[serde(deserialize_with = "lenient")]
    pub event_format: String,
    #[serde(deserialize_with = "lenient")]
    pub event_name: String,
    #[serde(deserialize_with = "lenient")]
    pub score_format: ScoreFormat,
    #[serde(deserialize_with = "lenient")]
    pub confirmed: bool,
    #[serde(deserialize_with = "lenient")]
    pub match_source: String,
    #[serde(deserialize_with = "lenient")]
    pub no_of_games: u32,
    #[serde(deserialize_with = "lenient")]
    pub status: String,
    #[serde(deserialize_with = "lenient")]
    pub created: String,
    /// Normally exactly two entries.
    #[serde(deserialize_with = "lenient")]
    pub teams: Vec<Team>,
}

impl Record for Match {
    const KIND: &'static str = "match";
}

impl Match {
    pub fn winning_team(&self) -> Option<&Team> {
        self.teams.iter().find(|team| team.winner)
    }
}

/// Result of the single-player lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(deserialize_with = "lenient")]
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub dupr_id: String,
    #[serde(deserialize_with = "lenient")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient")]
    pub first_name: String,
    #[serde(deserialize_with = "lenient")]
    pub last_name: String,
    #[serde(deserialize_with = "lenient")]
    pub short_address: String,
    #[serde(deserialize_with = "lenient")]
    pub gender: String,
    #[serde(deserialize_with = "lenient")]
    pub age: u32,
    #[serde(deserialize_with = "lenient")]
    pub image_url: String,
    #[serde(deserialize_with = "lenient")]
    pub email: String,
    #[serde(deserialize_with = "lenient")]
    pub phone: String,
    #[serde(deserialize_with = "lenient")]
    pub ratings: Ratings,
}

impl Record for PlayerProfile {
    const KIND: &'static str = "player";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::decode;
    use serde_json::json;

    fn sample_match() -> serde_json::Value {
        json!({
            "id": 4399001234u64,
            "matchId": 4399001234u64,
            "userId": 0,
            "displayIdentity": "KM1234G1",
            "venue": "",
            "location": "",
            "league": "Boston Classic - Women's Doubles 3.5",
            "eventDate": "2022-12-01",
            "eventFormat": "DOUBLES",
            "scoreFormat": {"id": 5994912345u64, "format": "Best 2 out of 3 Games to 11", "games": 3, "winningScore": 11},
            "confirmed": true,
            "teams": [
                {
                    "id": 6280112345u64, "serial": 1,
                    "player1": {"id": 1, "fullName": "Mary Smith", "duprId": "12AV70", "imageUrl": null},
                    "player2": {"id": 2, "fullName": "Kim Jones", "duprId": "12QX32", "imageUrl": null},
                    "game1": 11, "game2": 11, "game3": -1, "game4": -1, "game5": -1,
                    "winner": true, "delta": "", "teamRating": ""
                },
                {
                    "id": 5111412345u64, "serial": 2,
                    "player1": {"id": 3, "fullName": "Pam Brown", "duprId": "323QW1", "imageUrl": null},
                    "player2": {"id": 4, "fullName": "Kate Jones", "duprId": "332AB1", "imageUrl": null},
                    "game1": 5, "game2": 7, "game3": -1, "game4": -1, "game5": -1,
                    "winner": false, "delta": "", "teamRating": ""
                }
            ],
            "created": "2022-08-23T16:06:36.114168Z",
            "eventName": "Boston Classic",
            "matchSource": "MANUAL",
            "noOfGames": 2,
            "status": "ACTIVE"
        })
    }

    #[test]
    fn test_match_decodes_nested_teams() {
        let m: Match = decode(sample_match());

        assert_eq!(m.match_id, 4399001234);
        assert_eq!(m.score_format.winning_score, 11);
        assert_eq!(m.teams.len(), 2);
        assert_eq!(m.teams[0].player1.full_name, "Mary Smith");
        assert_eq!(m.teams[0].player1.image_url, "");
        assert_eq!(m.teams[0].scores(), vec![11, 11]);
        assert_eq!(m.teams[1].scores(), vec![5, 7]);
        assert_eq!(m.winning_team().map(|t| t.serial), Some(1));
    }

    #[test]
    fn test_match_wire_roundtrip() {
        let original: Match = decode(sample_match());
        let decoded: Match = decode(serde_json::to_value(&original).unwrap());
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_player_profile_nested_ratings() {
        let response: ApiResponse<PlayerProfile> = serde_json::from_value(json!({
            "status": "SUCCESS",
            "result": {
                "id": 12345, "fullName": "John Smith", "firstName": "John", "lastName": "Smith",
                "shortAddress": "Boston, MA, US", "gender": "MALE", "age": 32,
                "ratings": {
                    "singles": "NR", "singlesVerified": "NR", "singlesProvisional": false,
                    "doubles": "3.37", "doublesVerified": "NR", "doublesProvisional": false,
                    "defaultRating": "DOUBLES"
                },
                "duprId": "3X7GM5", "sponsor": {}
            }
        }))
        .unwrap();

        assert!(response.is_success());
        assert_eq!(response.result.dupr_id, "3X7GM5");
        assert_eq!(response.result.ratings.display(), "3.37");
        assert_eq!(response.result.ratings.default_rating, "DOUBLES");
    }

    #[test]
    fn test_response_without_result_uses_default() {
        let response: ApiResponse<PlayerProfile> =
            serde_json::from_value(json!({"status": "FAILURE", "message": null})).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.message, "");
        assert_eq!(response.result, PlayerProfile::default());
    }

    #[test]
    fn test_null_result_keeps_status_and_message() {
        let response: ApiResponse<PlayerProfile> = serde_json::from_value(json!({
            "status": "FAILURE",
            "message": "Player not found",
            "result": null
        }))
        .unwrap();
        assert_eq!(response.status, "FAILURE");
        assert_eq!(response.message, "Player not found");
        assert_eq!(response.result, PlayerProfile::default());
    }
}
