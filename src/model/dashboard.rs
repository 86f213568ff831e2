use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::TodayStats;
use crate::model::employee::Department;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DepartmentCount {
    pub department: Department,
    #[schema(example = 4)]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Dashboard {
    #[schema(example = 12)]
    pub total_employees: i64,
    pub today_stats: TodayStats,
    pub department_stats: Vec<DepartmentCount>,
}
