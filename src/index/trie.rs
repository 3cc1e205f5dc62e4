/// 定长键近似索引：按字符建边的前缀树。
///
/// - 节点保存在 arena（`Vec<Node>`）中，以下标互相引用，0 号为根节点。
/// - 每个节点只记录实际创建过的子节点（稀疏的 `(symbol, child)` 列表，按创建顺序），
///   内存与插入的键数成正比，而不是字母表大小的 K 次方。
/// - 值挂在走完整个键后到达的节点上，重复插入会累积，不去重。
#[derive(Debug, Clone)]
pub struct Trie<V> {
    nodes: Vec<Node<V>>,
    n_values: usize,
}

#[derive(Debug, Clone)]
struct Node<V> {
    children: Vec<(u8, usize)>,
    values: Vec<V>,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self { children: Vec::new(), values: Vec::new() }
    }

    #[inline]
    fn child(&self, symbol: u8) -> Option<usize> {
        self.children.iter().find(|&&(s, _)| s == symbol).map(|&(_, c)| c)
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self { nodes: vec![Node::new()], n_values: 0 }
    }

    /// 清空所有键与值，回到只有根节点的状态
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new());
        self.n_values = 0;
    }

    /// 沿 key 走（必要时创建）路径，并把 value 追加到终点节点
    pub fn insert(&mut self, key: &[u8], value: V) {
        let mut cur = 0usize;
        for &symbol in key {
            cur = match self.nodes[cur].child(symbol) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[cur].children.push((symbol, next));
                    next
                }
            };
        }
        self.nodes[cur].values.push(value);
        self.n_values += 1;
    }

    /// 已存储的值总数（含重复）
    pub fn len(&self) -> usize {
        self.n_values
    }

    pub fn is_empty(&self) -> bool {
        self.n_values == 0
    }

    /// 节点总数（含根节点）
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<V: Clone> Trie<V> {
    /// 查找 key 对应的所有值。
    ///
    /// `exact_match_only == false` 时，沿路径最多允许一次替换：在任意深度可以走向
    /// 与查询字符不同的兄弟边，此后剩余部分必须精确匹配。
    ///
    /// 第一个字符总是要求精确匹配：若根节点没有对应子节点，直接返回空结果。
    /// 结果按“精确路径优先，其次按子节点创建顺序深度优先”的顺序拼接，不去重。
    pub fn find(&self, key: &[u8], exact_match_only: bool) -> Vec<V> {
        let mut out = Vec::new();
        let Some(&first) = key.first() else {
            return out;
        };
        if let Some(next) = self.nodes[0].child(first) {
            self.collect(key, 1, next, exact_match_only, &mut out);
        }
        out
    }

    fn collect(&self, key: &[u8], depth: usize, node: usize, substituted: bool, out: &mut Vec<V>) {
        let cur = &self.nodes[node];
        if depth == key.len() {
            out.extend(cur.values.iter().cloned());
            return;
        }

        let symbol = key[depth];
        if let Some(next) = cur.child(symbol) {
            self.collect(key, depth + 1, next, substituted, out);
        }
        if !substituted {
            for &(s, next) in &cur.children {
                if s != symbol {
                    self.collect(key, depth + 1, next, true, out);
                }
            }
        }
    }
}
