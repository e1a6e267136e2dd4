//! Flatten typed records into CSV rows.

use dupr_client::{Match, Member, Team};

/// `full name, doubles rating` per member.
pub fn member_rows(members: &[Member]) -> Vec<Vec<String>> {
    members
        .iter()
        .map(|m| vec![m.full_name.clone(), m.ratings.display().to_string()])
        .collect()
}

fn team_players(team: Option<&Team>) -> String {
    team.map(|t| format!("{} / {}", t.player1.full_name, t.player2.full_name))
        .unwrap_or_default()
}

fn team_scores(team: Option<&Team>) -> String {
    team.map(|t| {
        t.scores()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("-")
    })
    .unwrap_or_default()
}

/// One row per match: date, event, both teams with their game scores, and
/// the winning side's serial.
pub fn match_rows(matches: &[Match]) -> Vec<Vec<String>> {
    matches
        .iter()
        .map(|m| {
            let first = m.teams.first();
            let second = m.teams.get(1);
            vec![
                m.match_id.to_string(),
                m.event_date.clone(),
                m.event_name.clone(),
                team_players(first),
                team_scores(first),
                team_players(second),
                team_scores(second),
                m.winning_team()
                    .map(|t| t.serial.to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dupr_client::decode;
    use serde_json::json;

    #[test]
    fn test_member_rows_use_doubles() {
        let members: Vec<Member> = vec![
            decode(json!({"fullName": "John Smith", "singles": "NR", "doubles": "3.37"})),
            decode(json!({"fullName": "No Rating"})),
        ];

        assert_eq!(
            member_rows(&members),
            vec![
                vec!["John Smith".to_string(), "3.37".to_string()],
                vec!["No Rating".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn test_match_rows_with_missing_team() {
        let m: Match = decode(json!({
            "matchId": 99,
            "eventDate": "2023-05-01",
            "eventName": "Spring League",
            "teams": [{
                "serial": 1,
                "player1": {"fullName": "A"},
                "player2": {"fullName": "B"},
                "game1": 11, "game2": 9, "game3": 11, "game4": -1, "game5": -1,
                "winner": true
            }]
        }));

        let rows = match_rows(&[m]);
        assert_eq!(
            rows[0],
            vec!["99", "2023-05-01", "Spring League", "A / B", "11-9-11", "", "", "1"]
        );
    }
}
