//! 预导入模块，方便使用

pub use super::answer_keys::{
    ActiveModel as AnswerKeyActiveModel, Entity as AnswerKeys, Model as AnswerKeyModel,
};
pub use super::assignment_students::{
    ActiveModel as AssignmentStudentActiveModel, Entity as AssignmentStudents,
    Model as AssignmentStudentModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::generated_questions::{
    ActiveModel as GeneratedQuestionsActiveModel, Entity as GeneratedQuestions,
    Model as GeneratedQuestionsModel,
};
pub use super::students::{ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::worksheets::{
    ActiveModel as WorksheetActiveModel, Entity as Worksheets, Model as WorksheetModel,
};
