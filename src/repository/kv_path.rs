// ==========================================
// 航线舱位配置向导 - 层级路径工具
// ==========================================
// 路径格式: "presets/FRA_MUC"（'/' 分隔, 无首尾斜杠, 无空段）
// 子树读取: 将 prefix 下的所有叶子组装为嵌套 JSON 对象
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use serde_json::{Map, Value};

pub const PATH_SEPARATOR: char = '/';

/// 校验路径并返回规范形式
pub fn validate_path(path: &str) -> RepositoryResult<&str> {
    if path.is_empty() {
        return Err(RepositoryError::InvalidPath("路径为空".to_string()));
    }
    if path.split(PATH_SEPARATOR).any(|segment| segment.trim().is_empty()) {
        return Err(RepositoryError::InvalidPath(path.to_string()));
    }
    Ok(path)
}

/// 拼接路径段
pub fn join(parent: &str, child: &str) -> String {
    format!("{}{}{}", parent, PATH_SEPARATOR, child)
}

/// 子树前缀（"presets" -> "presets/"）
pub fn subtree_prefix(path: &str) -> String {
    format!("{}{}", path, PATH_SEPARATOR)
}

/// 将 (完整路径, 值) 列表组装为以 `path` 为根的嵌套对象
///
/// # 返回
/// - None: 没有任何后代
/// - Some(Value::Object): 组装后的子树
pub fn assemble_subtree<I>(path: &str, entries: I) -> Option<Value>
where
    I: IntoIterator<Item = (String, Value)>,
{
    let prefix = subtree_prefix(path);
    let mut root = Map::new();
    let mut found = false;

    for (full_path, value) in entries {
        let Some(relative) = full_path.strip_prefix(&prefix) else {
            continue;
        };
        found = true;
        insert_nested(&mut root, relative, value);
    }

    found.then_some(Value::Object(root))
}

fn insert_nested(node: &mut Map<String, Value>, relative: &str, value: Value) {
    match relative.split_once(PATH_SEPARATOR) {
        None => {
            node.insert(relative.to_string(), value);
        }
        Some((head, rest)) => {
            let child = node
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                // 叶子与子树冲突时以子树为准
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert_nested(map, rest, value);
            }
        }
    }
}
