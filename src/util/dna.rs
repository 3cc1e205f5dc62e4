/// 基因组字母表：{A, C, G, T, N}
pub const ALPHABET: [u8; 5] = [b'A', b'C', b'G', b'T', b'N'];

/// 将单个碱基规范化为大写；不在字母表中的字符返回 None
#[inline]
pub fn normalize_base(b: u8) -> Option<u8> {
    let up = b.to_ascii_uppercase();
    ALPHABET.contains(&up).then_some(up)
}

/// 规范化整条序列；遇到非法字符时返回其下标与原字符
pub fn normalize_seq(seq: &[u8]) -> Result<Vec<u8>, (usize, u8)> {
    let mut out = Vec::with_capacity(seq.len());
    for (i, &b) in seq.iter().enumerate() {
        match normalize_base(b) {
            Some(nb) => out.push(nb),
            None => return Err((i, b)),
        }
    }
    Ok(out)
}

/// 两条等长序列的错配数（汉明距离）；长度不同时按较短者比较
pub fn hamming(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}
