pub mod formatter;

pub use formatter::{
    format_asado_detail, format_asado_list, format_penalties, format_points, format_ranking_table,
    format_ranking_tsv, format_users, should_use_colors,
};
