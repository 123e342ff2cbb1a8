//! SQL extraction from model replies

/// Opening fence of the SQL block
pub const SQL_FENCE: &str = "```sql";

/// Any fence; closes the SQL block
pub const FENCE: &str = "```";

/// Pull the SQL out of a model reply
///
/// Lines are collected until a line starting with ```` ``` ````. A line
/// starting with ```` ```sql ```` discards everything collected so far, so
/// prose ahead of the block is dropped. Without any fence the whole reply is
/// returned, one `\n` per line.
pub fn extract_sql(reply: &str) -> String {
    let mut sql = String::new();

    for line in reply.split('\n') {
        if line.starts_with(SQL_FENCE) {
            sql.clear();
            continue;
        }
        if line.starts_with(FENCE) {
            break;
        }
        sql.push_str(line);
        sql.push('\n');
    }

    sql
}
