use std::fmt::Display;

/// Filter, projection and ordering for a collection read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<(String, String)>,
    select: Option<String>,
    order: Option<String>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Display) -> Self {
        let encoded = urlencoding::encode(&value.to_string()).into_owned();
        self.filters.push((field.to_string(), format!("eq.{}", encoded)));
        self
    }

    /// Matches any of `values`. An empty list matches nothing.
    pub fn in_list<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let joined = values
            .into_iter()
            .map(|v| format!("\"{}\"", v.to_string().replace('"', "")))
            .collect::<Vec<_>>()
            .join(",");
        let encoded = urlencoding::encode(&format!("({})", joined)).into_owned();
        self.filters.push((field.to_string(), format!("in.{}", encoded)));
        self
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.select = Some(columns.join(","));
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order = Some(format!("{}.desc", field));
        self
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.order = Some(format!("{}.asc", field));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = self
            .filters
            .iter()
            .map(|(field, condition)| format!("{}={}", field, condition))
            .collect();

        if let Some(select) = &self.select {
            parts.push(format!("select={}", select));
        }
        if let Some(order) = &self.order {
            parts.push(format!("order={}", order));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={}", limit));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_query_string() {
        assert_eq!(Query::new().to_query_string(), "");
        assert!(Query::new().is_unfiltered());
    }

    #[test]
    fn eq_filters_are_url_encoded() {
        let query = Query::new().eq("email", "jane+test@example.com");
        assert_eq!(query.to_query_string(), "?email=eq.jane%2Btest%40example.com");
    }

    #[test]
    fn combined_query_keeps_parameter_order() {
        let query = Query::new()
            .eq("patientId", "p1")
            .select(&["id", "name"])
            .order_desc("createdAt")
            .limit(1);
        assert_eq!(
            query.to_query_string(),
            "?patientId=eq.p1&select=id,name&order=createdAt.desc&limit=1"
        );
    }

    #[test]
    fn in_list_quotes_each_value() {
        let query = Query::new().in_list("patientId", ["a", "b"]);
        assert_eq!(query.to_query_string(), "?patientId=in.%28%22a%22%2C%22b%22%29");
    }
}
