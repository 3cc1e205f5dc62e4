use std::collections::HashMap;

use log::debug;
use rayon::prelude::*;

use super::{GenomeMatch, GenomeMatcher, QueryError};
use crate::genome::Genome;

impl GenomeMatcher {
    /// 按窗口统计 `query` 与 library 中各基因组的相似度。
    ///
    /// 把 `query` 切成互不重叠、长度为 `fragment_match_length` 的窗口（丢弃末尾不足一窗的部分），
    /// 每个窗口以 `minimum_length = fragment_match_length` 调用
    /// [`find_genomes_with_this_dna`](GenomeMatcher::find_genomes_with_this_dna)。
    /// 某基因组在一个窗口中出现即计 1 次命中，`percent_match = 100 * hits / 窗口数`。
    ///
    /// 返回不低于 `match_percent_threshold` 的基因组，按 percent_match 降序、名称升序排列。
    /// 窗口之间互相独立，使用 rayon 并行查询。
    pub fn find_related_genomes(
        &self,
        query: &Genome,
        fragment_match_length: usize,
        exact_match_only: bool,
        match_percent_threshold: f64,
    ) -> Result<Vec<GenomeMatch>, QueryError> {
        let k = self.min_search_length;
        if fragment_match_length < k {
            return Err(QueryError::FragmentLengthBelowSearchLength { fragment: fragment_match_length, search: k });
        }

        let window_count = query.len() / fragment_match_length;
        if window_count == 0 {
            return Err(QueryError::NoMatches);
        }

        let hits: HashMap<String, usize> = query
            .bases()
            .par_chunks_exact(fragment_match_length)
            .map(|window| match self.find_genomes_with_this_dna(window, fragment_match_length, exact_match_only) {
                Ok(matches) => Ok(matches.into_iter().map(|m| m.genome_name).collect::<Vec<_>>()),
                Err(QueryError::NoMatches) => Ok(Vec::new()),
                Err(e) => Err(e),
            })
            .try_fold(HashMap::new, |mut acc, names| {
                for name in names? {
                    *acc.entry(name).or_insert(0usize) += 1;
                }
                Ok::<_, QueryError>(acc)
            })
            .try_reduce(HashMap::new, |mut a, b| {
                for (name, n) in b {
                    *a.entry(name).or_insert(0) += n;
                }
                Ok(a)
            })?;
        debug!(
            "query '{}': {} windows of {} bp, {} genomes hit",
            query.name(),
            window_count,
            fragment_match_length,
            hits.len()
        );

        let mut results: Vec<GenomeMatch> = hits
            .into_iter()
            .map(|(genome_name, n)| GenomeMatch {
                genome_name,
                percent_match: n as f64 * 100.0 / window_count as f64,
            })
            .filter(|r| r.percent_match >= match_percent_threshold)
            .collect();

        if results.is_empty() {
            return Err(QueryError::NoMatches);
        }
        results.sort_by(|a, b| {
            b.percent_match
                .total_cmp(&a.percent_match)
                .then_with(|| a.genome_name.cmp(&b.genome_name))
        });
        Ok(results)
    }
}
