use crate::{error::Result, util, ProblemId, Url};

pub const BASE_URL: &str = "https://codeforces.com";

pub fn contest_url(contest_id: u32) -> Result<Url> {
    util::parse_url(format!("{}/contest/{}", BASE_URL, contest_id))
}

/// ```
/// use cfr_webclient::{codeforces, ProblemId};
///
/// let id = ProblemId::parse("b").unwrap();
/// let url = codeforces::problem_url(1850, &id).unwrap();
/// assert_eq!(url.as_str(), "https://codeforces.com/contest/1850/problem/B");
/// ```
pub fn problem_url(contest_id: u32, problem_id: &ProblemId) -> Result<Url> {
    util::parse_url(format!(
        "{}/contest/{}/problem/{}",
        BASE_URL, contest_id, problem_id
    ))
}
