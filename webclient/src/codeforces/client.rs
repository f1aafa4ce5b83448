use ::async_trait::async_trait;
use ::std::time::Duration;

use super::{helper, urls};
use crate::{error::*, http, model::*, util};

pub struct CodeforcesClient {
    http: http::Client,
}

impl CodeforcesClient {
    const REQUEST_INTERVAL: Duration = Duration::from_millis(200);

    pub fn new() -> Result<Self> {
        Ok(Self {
            http: http::Client::new(Self::REQUEST_INTERVAL)?,
        })
    }
}

#[async_trait]
impl ProblemSource for CodeforcesClient {
    fn platform(&self) -> Platform {
        Platform::Codeforces
    }

    fn problem_url(&self, contest_id: u32, problem_id: &ProblemId) -> Result<Url> {
        urls::problem_url(contest_id, problem_id)
    }

    async fn fetch_problem_ids(&self, contest_id: u32) -> Result<Vec<ProblemId>> {
        let url = urls::contest_url(contest_id)?;
        let doc = util::fetch_html(&self.http, url).await?;
        helper::scrape_problem_ids(&doc)
    }

    async fn fetch_problem(&self, contest_id: u32, problem_id: &ProblemId) -> Result<ProblemPage> {
        let url = urls::problem_url(contest_id, problem_id)?;
        let doc = util::fetch_html(&self.http, url.clone()).await?;

        let title = helper::scrape_title(&doc).unwrap_or_else(|| format!("Problem {}", problem_id));
        let samples = helper::scrape_samples(&doc, url.as_str())?;
        if samples.is_empty() {
            log::warn!("No sample testcase found in {}", url);
        }

        Ok(ProblemPage {
            platform: self.platform(),
            url,
            contest_id,
            problem_id: problem_id.to_owned(),
            title,
            samples,
        })
    }
}
