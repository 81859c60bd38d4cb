use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户（导师）表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::UserMetadata).text().not_null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::Grade).string().not_null())
                    .col(ColumnDef::new(Students::Subjects).text().not_null())
                    .col(ColumnDef::new(Students::WeakTopics).text().not_null())
                    .col(ColumnDef::new(Students::Avatar).string().null())
                    .col(
                        ColumnDef::new(Students::LastActivity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建答案表
        manager
            .create_table(
                Table::create()
                    .table(AnswerKeys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnswerKeys::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AnswerKeys::UploaderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AnswerKeys::FileName).string().not_null())
                    .col(ColumnDef::new(AnswerKeys::FileUrl).string().not_null())
                    .col(ColumnDef::new(AnswerKeys::StorageBucket).string().not_null())
                    .col(ColumnDef::new(AnswerKeys::StoragePath).string().not_null())
                    .col(ColumnDef::new(AnswerKeys::Subject).string().null())
                    .col(ColumnDef::new(AnswerKeys::Grade).string().null())
                    .col(
                        ColumnDef::new(AnswerKeys::UploadDate)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AnswerKeys::Table, AnswerKeys::UploaderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Subject).string().null())
                    .col(ColumnDef::new(Assignments::Grade).string().null())
                    .col(ColumnDef::new(Assignments::DueDate).string().null())
                    .col(
                        ColumnDef::new(Assignments::AnswerKeyId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Assignments::AnswerKeyUrl).string().null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::AnswerKeyId)
                            .to(AnswerKeys::Table, AnswerKeys::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业-学生关联表
        manager
            .create_table(
                Table::create()
                    .table(AssignmentStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentStudents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssignmentStudents::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentStudents::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentStudents::AssignedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssignmentStudents::Table, AssignmentStudents::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssignmentStudents::Table, AssignmentStudents::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignment_students_unique")
                    .table(AssignmentStudents::Table)
                    .col(AssignmentStudents::AssignmentId)
                    .col(AssignmentStudents::StudentId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // 创建学生作业表
        manager
            .create_table(
                Table::create()
                    .table(Worksheets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Worksheets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Worksheets::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Worksheets::AssignmentId).big_integer().null())
                    .col(ColumnDef::new(Worksheets::AnswerKeyId).big_integer().null())
                    .col(ColumnDef::new(Worksheets::AnswerKeyUrl).string().null())
                    .col(ColumnDef::new(Worksheets::FileName).string().not_null())
                    .col(ColumnDef::new(Worksheets::FileUrl).string().not_null())
                    .col(ColumnDef::new(Worksheets::StorageBucket).string().not_null())
                    .col(ColumnDef::new(Worksheets::StoragePath).string().not_null())
                    .col(ColumnDef::new(Worksheets::Status).string().not_null())
                    .col(ColumnDef::new(Worksheets::Score).integer().null())
                    .col(ColumnDef::new(Worksheets::WeakTopics).text().null())
                    .col(ColumnDef::new(Worksheets::AiSuggestions).text().null())
                    .col(
                        ColumnDef::new(Worksheets::UploadDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Worksheets::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Worksheets::Table, Worksheets::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Worksheets::Table, Worksheets::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Worksheets::Table, Worksheets::AnswerKeyId)
                            .to(AnswerKeys::Table, AnswerKeys::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建生成题目表
        manager
            .create_table(
                Table::create()
                    .table(GeneratedQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GeneratedQuestions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GeneratedQuestions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedQuestions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedQuestions::Questions)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GeneratedQuestions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GeneratedQuestions::Table, GeneratedQuestions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GeneratedQuestions::Table, GeneratedQuestions::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GeneratedQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Worksheets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssignmentStudents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AnswerKeys::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    Status,
    UserMetadata,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    TeacherId,
    Name,
    Grade,
    Subjects,
    WeakTopics,
    Avatar,
    LastActivity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AnswerKeys {
    #[sea_orm(iden = "answer_keys")]
    Table,
    Id,
    UploaderId,
    FileName,
    FileUrl,
    StorageBucket,
    StoragePath,
    Subject,
    Grade,
    UploadDate,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    CreatedBy,
    Title,
    Subject,
    Grade,
    DueDate,
    AnswerKeyId,
    AnswerKeyUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AssignmentStudents {
    #[sea_orm(iden = "assignment_students")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    AssignedAt,
}

#[derive(DeriveIden)]
enum Worksheets {
    #[sea_orm(iden = "worksheets")]
    Table,
    Id,
    StudentId,
    AssignmentId,
    AnswerKeyId,
    AnswerKeyUrl,
    FileName,
    FileUrl,
    StorageBucket,
    StoragePath,
    Status,
    Score,
    WeakTopics,
    AiSuggestions,
    UploadDate,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GeneratedQuestions {
    #[sea_orm(iden = "generated_questions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Questions,
    CreatedAt,
}
