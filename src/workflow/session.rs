//! 会话状态
//!
//! 一次交互会话中的全部状态：已生成的题目页、当前页、已选题目、试卷抬头。
//! `Session` 是不可变值，所有修改都通过 [`Session::apply`] 返回新状态。

use crate::error::SessionError;
use crate::models::exam::ExamMetadata;
use crate::models::question::QuestionRecord;

/// 已选中的题目，记录它来自哪一页的第几题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedQuestion {
    pub page: usize,
    pub index: usize,
    pub record: QuestionRecord,
}

/// 会话动作，下标均为 0-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 新生成的一页题目，添加后自动跳到该页
    AddPage(Vec<QuestionRecord>),
    NextPage,
    PrevPage,
    GoToPage(usize),
    /// 加入试卷；同题干的题目已在列表中时不重复添加
    Select { page: usize, index: usize },
    /// 撤销加入
    Deselect { page: usize, index: usize },
    /// 从已选列表中按位置删除
    RemoveSelected(usize),
    /// 调整已选列表顺序
    MoveSelected { from: usize, to: usize },
    ClearSelection,
    SetShowAnswers(bool),
    SetExamName(String),
    SetDuration(String),
    SetDate(String),
}

/// 会话状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pages: Vec<Vec<QuestionRecord>>,
    current_page: usize,
    selected: Vec<SelectedQuestion>,
    metadata: ExamMetadata,
}

impl Session {
    pub fn new(metadata: ExamMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// 应用一个动作，返回新的会话状态，`self` 保持不变
    ///
    /// 错误中的页码、题号、位置都是面向用户的 1-based 编号
    pub fn apply(&self, action: Action) -> Result<Session, SessionError> {
        let mut next = self.clone();

        match action {
            Action::AddPage(records) => {
                if records.is_empty() {
                    return Err(SessionError::EmptyPage);
                }
                next.pages.push(records);
                next.current_page = next.pages.len() - 1;
            }
            Action::NextPage => {
                next.current_page = self.check_page(self.current_page + 1)?;
            }
            Action::PrevPage => {
                let target = self.current_page.checked_sub(1).ok_or(SessionError::PageOutOfRange {
                    page: 0,
                    page_count: self.pages.len(),
                })?;
                next.current_page = self.check_page(target)?;
            }
            Action::GoToPage(page) => {
                next.current_page = self.check_page(page)?;
            }
            Action::Select { page, index } => {
                let record = self.record_at(page, index)?;
                if !self.is_text_selected(record.question_text()) {
                    next.selected.push(SelectedQuestion {
                        page,
                        index,
                        record: record.clone(),
                    });
                }
            }
            Action::Deselect { page, index } => {
                let text = self.record_at(page, index)?.question_text();
                next.selected.retain(|s| s.record.question_text() != text);
            }
            Action::RemoveSelected(position) => {
                self.check_selection(position)?;
                next.selected.remove(position);
            }
            Action::MoveSelected { from, to } => {
                self.check_selection(from)?;
                self.check_selection(to)?;
                let item = next.selected.remove(from);
                next.selected.insert(to, item);
            }
            Action::ClearSelection => next.selected.clear(),
            Action::SetShowAnswers(show) => next.metadata.show_answers = show,
            Action::SetExamName(name) => next.metadata.exam_name = name,
            Action::SetDuration(duration) => next.metadata.duration_minutes = duration,
            Action::SetDate(date) => next.metadata.date = date,
        }

        Ok(next)
    }

    // ========== 查询 ==========

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// 当前页的题目，还没有生成过题目时为空
    pub fn current_records(&self) -> &[QuestionRecord] {
        self.pages
            .get(self.current_page)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 某一题是否已加入试卷（决定显示"添加"还是"撤销"）
    pub fn is_selected(&self, page: usize, index: usize) -> bool {
        self.pages
            .get(page)
            .and_then(|records| records.get(index))
            .is_some_and(|record| self.is_text_selected(record.question_text()))
    }

    pub fn selected(&self) -> &[SelectedQuestion] {
        &self.selected
    }

    /// 按当前顺序排列的已选题目，用于导出
    pub fn selected_records(&self) -> Vec<QuestionRecord> {
        self.selected.iter().map(|s| s.record.clone()).collect()
    }

    pub fn metadata(&self) -> &ExamMetadata {
        &self.metadata
    }

    // ========== 内部校验 ==========

    fn is_text_selected(&self, text: &str) -> bool {
        self.selected.iter().any(|s| s.record.question_text() == text)
    }

    fn check_page(&self, page: usize) -> Result<usize, SessionError> {
        if page < self.pages.len() {
            Ok(page)
        } else {
            Err(SessionError::PageOutOfRange {
                page: page + 1,
                page_count: self.pages.len(),
            })
        }
    }

    fn record_at(&self, page: usize, index: usize) -> Result<&QuestionRecord, SessionError> {
        let records = self.pages.get(page).ok_or(SessionError::PageOutOfRange {
            page: page + 1,
            page_count: self.pages.len(),
        })?;
        records.get(index).ok_or(SessionError::QuestionOutOfRange {
            page: page + 1,
            index: index + 1,
            len: records.len(),
        })
    }

    fn check_selection(&self, position: usize) -> Result<(), SessionError> {
        if position < self.selected.len() {
            Ok(())
        } else {
            Err(SessionError::SelectionOutOfRange {
                position: position + 1,
                len: self.selected.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::OptionLabel;

    fn record(text: &str) -> QuestionRecord {
        let options = ["a", "b", "c", "d"].map(String::from);
        QuestionRecord::new(text, options, OptionLabel::A).unwrap()
    }

    fn page(texts: &[&str]) -> Vec<QuestionRecord> {
        texts.iter().map(|t| record(t)).collect()
    }

    fn two_pages() -> Session {
        Session::default()
            .apply(Action::AddPage(page(&["1. a", "2. b", "3. c"])))
            .unwrap()
            .apply(Action::AddPage(page(&["1. x", "2. y"])))
            .unwrap()
    }

    fn selected_texts(session: &Session) -> Vec<&str> {
        session
            .selected()
            .iter()
            .map(|s| s.record.question_text())
            .collect()
    }

    #[test]
    fn test_add_page_jumps_to_new_page() {
        let session = two_pages();
        assert_eq!(session.page_count(), 2);
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.current_records().len(), 2);
    }

    #[test]
    fn test_empty_page_rejected() {
        let err = Session::default().apply(Action::AddPage(vec![])).unwrap_err();
        assert_eq!(err, SessionError::EmptyPage);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let before = two_pages();
        let snapshot = before.clone();

        let after = before.apply(Action::Select { page: 0, index: 1 }).unwrap();

        assert_eq!(before, snapshot);
        assert_eq!(after.selected().len(), 1);
    }

    #[test]
    fn test_page_navigation_bounds() {
        let session = two_pages();

        let err = session.apply(Action::NextPage).unwrap_err();
        assert_eq!(
            err,
            SessionError::PageOutOfRange {
                page: 3,
                page_count: 2
            }
        );

        let first = session.apply(Action::PrevPage).unwrap();
        assert_eq!(first.current_page(), 0);
        assert!(first.apply(Action::PrevPage).is_err());
        assert_eq!(first.apply(Action::GoToPage(1)).unwrap().current_page(), 1);
        assert!(first.apply(Action::GoToPage(2)).is_err());

        assert!(Session::default().apply(Action::NextPage).is_err());
        assert!(Session::default().current_records().is_empty());
    }

    #[test]
    fn test_select_deduplicates_by_text() {
        let session = Session::default()
            .apply(Action::AddPage(page(&["1. same", "2. other"])))
            .unwrap()
            .apply(Action::AddPage(page(&["1. same"])))
            .unwrap()
            .apply(Action::Select { page: 0, index: 0 })
            .unwrap()
            .apply(Action::Select { page: 1, index: 0 })
            .unwrap()
            .apply(Action::Select { page: 0, index: 0 })
            .unwrap();

        assert_eq!(selected_texts(&session), vec!["1. same"]);
        assert!(session.is_selected(0, 0));
        assert!(session.is_selected(1, 0));
        assert!(!session.is_selected(0, 1));
    }

    #[test]
    fn test_select_out_of_range() {
        let session = two_pages();
        let err = session.apply(Action::Select { page: 1, index: 5 }).unwrap_err();
        assert_eq!(
            err,
            SessionError::QuestionOutOfRange {
                page: 2,
                index: 6,
                len: 2
            }
        );
        assert!(session.apply(Action::Select { page: 9, index: 0 }).is_err());
    }

    #[test]
    fn test_deselect_resets_button_state() {
        let session = two_pages()
            .apply(Action::Select { page: 0, index: 0 })
            .unwrap()
            .apply(Action::Select { page: 1, index: 1 })
            .unwrap()
            .apply(Action::Deselect { page: 0, index: 0 })
            .unwrap();

        assert!(!session.is_selected(0, 0));
        assert_eq!(selected_texts(&session), vec!["2. y"]);

        // 未选中的题目撤销是空操作
        let again = session.apply(Action::Deselect { page: 0, index: 2 }).unwrap();
        assert_eq!(again, session);
    }

    #[test]
    fn test_remove_and_move_selected() {
        let session = two_pages()
            .apply(Action::Select { page: 0, index: 0 })
            .unwrap()
            .apply(Action::Select { page: 0, index: 1 })
            .unwrap()
            .apply(Action::Select { page: 1, index: 0 })
            .unwrap();

        let moved = session.apply(Action::MoveSelected { from: 2, to: 0 }).unwrap();
        assert_eq!(selected_texts(&moved), vec!["1. x", "1. a", "2. b"]);

        let removed = moved.apply(Action::RemoveSelected(1)).unwrap();
        assert_eq!(selected_texts(&removed), vec!["1. x", "2. b"]);
        assert!(!removed.is_selected(0, 0));

        assert_eq!(
            removed.apply(Action::RemoveSelected(2)).unwrap_err(),
            SessionError::SelectionOutOfRange { position: 3, len: 2 }
        );
        assert!(removed.apply(Action::MoveSelected { from: 0, to: 2 }).is_err());
    }

    #[test]
    fn test_clear_and_metadata() {
        let session = two_pages()
            .apply(Action::Select { page: 0, index: 0 })
            .unwrap()
            .apply(Action::ClearSelection)
            .unwrap()
            .apply(Action::SetShowAnswers(true))
            .unwrap()
            .apply(Action::SetExamName("Final".into()))
            .unwrap()
            .apply(Action::SetDuration("120".into()))
            .unwrap()
            .apply(Action::SetDate("2026-01-15".into()))
            .unwrap();

        assert!(session.selected().is_empty());
        let metadata = session.metadata();
        assert!(metadata.show_answers);
        assert_eq!(metadata.exam_name, "Final");
        assert_eq!(metadata.duration_minutes, "120");
        assert_eq!(metadata.date, "2026-01-15");
    }

    #[test]
    fn test_selected_records_follow_selection_order() {
        let session = two_pages()
            .apply(Action::Select { page: 1, index: 1 })
            .unwrap()
            .apply(Action::Select { page: 0, index: 2 })
            .unwrap();

        let texts: Vec<String> = session
            .selected_records()
            .iter()
            .map(|r| r.question_text().to_string())
            .collect();
        assert_eq!(texts, vec!["2. y", "3. c"]);
        assert_eq!(session.selected()[0].page, 1);
        assert_eq!(session.selected()[0].index, 1);
    }
}
