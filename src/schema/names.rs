/// Names of the compiled types and operations for one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNames {
    pub output_type_name: String,
    pub where_unique_input_name: String,
    pub where_input_name: String,
    pub create_input_name: String,
    pub update_input_name: String,
    pub list_order_name: String,
    pub item_query_name: String,
    pub list_query_name: String,
    pub list_query_count_name: String,
    pub create_mutation_name: String,
    pub update_mutation_name: String,
    pub delete_mutation_name: String,
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[must_use]
pub fn get_gql_names(
    list_key: &str,
    singular_graphql_name: &str,
    plural_graphql_name: &str,
) -> ListNames {
    let list_query_name = lower_first(plural_graphql_name);
    ListNames {
        output_type_name: list_key.to_string(),
        where_unique_input_name: format!("{list_key}WhereUniqueInput"),
        where_input_name: format!("{list_key}WhereInput"),
        create_input_name: format!("{list_key}CreateInput"),
        update_input_name: format!("{list_key}UpdateInput"),
        list_order_name: format!("{list_key}OrderByInput"),
        item_query_name: lower_first(singular_graphql_name),
        list_query_count_name: format!("{list_query_name}Count"),
        list_query_name,
        create_mutation_name: format!("create{singular_graphql_name}"),
        update_mutation_name: format!("update{singular_graphql_name}"),
        delete_mutation_name: format!("delete{singular_graphql_name}"),
    }
}

/// Name of the nested sort type for the multi field `field_path`.
#[must_use]
pub fn multi_sort_name(list_key: &str, field_path: &str) -> String {
    format!("{list_key}_{field_path}SortBy")
}
